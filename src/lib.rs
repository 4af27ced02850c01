//! Headless voxel world engine: procedural infinite terrain streamed in
//! fixed-size chunks around a moving observer, with background generation
//! and meshing on worker pools and budgeted main-thread applies.

pub mod config;
pub mod constants;
pub mod core;
pub mod error;
pub mod mesh;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod streaming;
pub mod world;

pub use config::WorldConfig;
pub use constants::{CHUNK_HEIGHT, CHUNK_SIZE};
pub use core::{BlockType, ChunkCoord, ChunkData, Direction};
pub use error::EngineError;
pub use mesh::{MeshBuffer, Vertex, generate_mesh};
pub use render::{HeadlessBackend, MeshHandle, RenderBackend};
pub use session::{WorldSession, WorldSessionBuilder};
pub use streaming::StreamingController;
pub use world::{Biome, BiomeField, ChunkGenerator, ChunkStore, TerrainField};
