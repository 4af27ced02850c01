use std::fmt;

use crate::core::chunk::ChunkCoord;

/// Errors surfaced by the engine. Per-chunk computational failures are
/// chunk-local and never propagate through this type; they are logged and
/// retried by the streaming controller instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// No renderer factory was configured; the streaming subsystem refuses
    /// to run rather than silently producing an un-renderable world.
    MissingRenderBackend,
    InvalidConfig(String),
    ChunkAlreadyPresent(ChunkCoord),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::MissingRenderBackend => {
                write!(f, "no render backend configured for the world session")
            }
            EngineError::InvalidConfig(msg) => write!(f, "invalid world config: {}", msg),
            EngineError::ChunkAlreadyPresent(coord) => {
                write!(f, "chunk {} already present in the store", coord)
            }
        }
    }
}

impl std::error::Error for EngineError {}
