//! Chunk meshing: geometry buffers, the face-culling mesher, and the
//! background mesh worker pool.

pub mod buffer;
pub mod loader;
pub mod mesher;

pub use buffer::{MeshBuffer, Vertex};
pub use loader::MeshLoader;
pub use mesher::generate_mesh;
