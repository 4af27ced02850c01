use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::core::block::BlockType;

/// Horizontal chunk grid coordinate. The vertical axis is not chunked.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Chunk containing the given continuous world position.
    pub fn from_world(pos: Vec3) -> Self {
        ChunkCoord {
            x: (pos.x / CHUNK_SIZE as f32).floor() as i32,
            z: (pos.z / CHUNK_SIZE as f32).floor() as i32,
        }
    }

    pub fn neighbor(self, dir: Direction) -> Self {
        let (dx, dz) = dir.offset();
        ChunkCoord::new(self.x + dx, self.z + dz)
    }

    /// Square-ring distance used by all three streaming radii.
    pub fn chebyshev(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Squared euclidean distance, used as generation priority.
    pub fn dist_sq(self, other: ChunkCoord) -> i32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// World-space anchor of this chunk (mesh origin).
    pub fn world_origin(self) -> Vec3 {
        Vec3::new(
            (self.x * CHUNK_SIZE) as f32,
            0.0,
            (self.z * CHUNK_SIZE) as f32,
        )
    }
}

impl fmt::Display for ChunkCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Cardinal neighbor directions on the horizontal chunk grid.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    North, // +z
    South, // -z
    East,  // +x
    West,  // -x
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::South => (0, -1),
            Direction::East => (1, 0),
            Direction::West => (-1, 0),
        }
    }

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }
}

/// Fixed-size block array for one chunk: `CHUNK_SIZE x CHUNK_HEIGHT x
/// CHUNK_SIZE`, indexed `[x][y][z]`. Every cell is an explicit `BlockType`
/// after population; air is a value, not a missing entry.
pub struct ChunkData {
    blocks: Box<[BlockType]>,
}

impl ChunkData {
    pub fn new() -> Self {
        let len = (CHUNK_SIZE * CHUNK_HEIGHT * CHUNK_SIZE) as usize;
        ChunkData {
            blocks: vec![BlockType::Air; len].into_boxed_slice(),
        }
    }

    #[inline]
    fn index(x: i32, y: i32, z: i32) -> usize {
        ((x * CHUNK_HEIGHT + y) * CHUNK_SIZE + z) as usize
    }

    pub fn in_bounds(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_SIZE && y >= 0 && y < CHUNK_HEIGHT && z >= 0 && z < CHUNK_SIZE
    }

    /// Local lookup. Out-of-range coordinates read as air; cross-chunk
    /// resolution lives in `ChunkStore::block_at`.
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockType {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)]
        } else {
            BlockType::Air
        }
    }

    pub fn set(&mut self, x: i32, y: i32, z: i32, block: BlockType) {
        if Self::in_bounds(x, y, z) {
            self.blocks[Self::index(x, y, z)] = block;
        }
    }

    /// Fill every cell from a local-coordinate generator function.
    pub fn fill_with<F>(&mut self, mut f: F)
    where
        F: FnMut(i32, i32, i32) -> BlockType,
    {
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                for y in 0..CHUNK_HEIGHT {
                    self.blocks[Self::index(x, y, z)] = f(x, y, z);
                }
            }
        }
    }
}

impl Default for ChunkData {
    fn default() -> Self {
        ChunkData::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_world_floors_negative_positions() {
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-0.5, 10.0, -16.5)),
            ChunkCoord::new(-1, -2)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(15.9, 0.0, 16.0)),
            ChunkCoord::new(0, 1)
        );
    }

    #[test]
    fn direction_opposites_are_involutive() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            let (dx, dz) = dir.offset();
            let (ox, oz) = dir.opposite().offset();
            assert_eq!((dx + ox, dz + oz), (0, 0));
        }
    }

    #[test]
    fn chunk_data_round_trips_and_defaults_to_air() {
        let mut data = ChunkData::new();
        assert_eq!(data.get(0, 0, 0), BlockType::Air);
        data.set(3, 100, 7, BlockType::Stone);
        assert_eq!(data.get(3, 100, 7), BlockType::Stone);
        // out-of-range reads are air, writes are ignored
        assert_eq!(data.get(-1, 0, 0), BlockType::Air);
        data.set(0, CHUNK_HEIGHT, 0, BlockType::Stone);
        assert_eq!(data.get(0, CHUNK_HEIGHT, 0), BlockType::Air);
    }

    #[test]
    fn fill_with_visits_every_cell() {
        let mut data = ChunkData::new();
        data.fill_with(|_, y, _| {
            if y < 10 {
                BlockType::Stone
            } else {
                BlockType::Air
            }
        });
        assert_eq!(data.get(15, 9, 15), BlockType::Stone);
        assert_eq!(data.get(15, 10, 15), BlockType::Air);
    }
}
