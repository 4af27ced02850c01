use serde::{Deserialize, Serialize};

/// Immutable block catalog. `Air` is the universal empty/culling sentinel:
/// out-of-range and unloaded-neighbor lookups all collapse to it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum BlockType {
    #[default]
    Air,
    Grass,
    Dirt,
    Stone,
    Wood,
    Leaves,
    Snow,
}

impl BlockType {
    pub fn is_solid(&self) -> bool {
        *self != BlockType::Air
    }

    /// Decoration blocks (tree trunks and canopies) are excluded from
    /// ground-level scans so trees don't register as terrain surface.
    pub fn is_decoration(&self) -> bool {
        matches!(self, BlockType::Wood | BlockType::Leaves)
    }

    /// Atlas tile (column, row) for the upward face.
    pub fn tile_top(&self) -> (u32, u32) {
        match self {
            BlockType::Grass => (0, 1),
            BlockType::Dirt => (2, 4),
            BlockType::Stone => (2, 3),
            BlockType::Wood => (1, 2),
            BlockType::Leaves => (4, 4),
            BlockType::Snow => (0, 4),
            BlockType::Air => (0, 3),
        }
    }

    /// Atlas tile for the four side faces.
    pub fn tile_side(&self) -> (u32, u32) {
        match self {
            BlockType::Grass => (3, 4),
            BlockType::Wood => (1, 3),
            _ => self.tile_top(),
        }
    }

    /// Atlas tile for the downward face.
    pub fn tile_bottom(&self) -> (u32, u32) {
        match self {
            BlockType::Grass => (2, 4),
            BlockType::Wood => (1, 2),
            _ => self.tile_top(),
        }
    }
}
