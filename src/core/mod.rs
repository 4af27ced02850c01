// Fundamental value types shared by every subsystem.
pub mod block;
pub mod chunk;

pub use block::BlockType;
pub use chunk::{ChunkCoord, ChunkData, Direction};
