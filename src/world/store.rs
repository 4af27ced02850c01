//! Chunk data storage and the 4-neighbor adjacency graph.
//!
//! The store owns block arrays only; renderable/collidable state lives in
//! the streaming layer. Neighbor links are reciprocal by construction:
//! linking A->B in a direction always links B->A in the opposite direction
//! within the same operation, and unlinking clears both sides. Lookups
//! across a missing link report air, never an error.

use rustc_hash::FxHashMap;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{ChunkCoord, ChunkData, Direction};
use crate::error::EngineError;

struct ChunkEntry {
    data: ChunkData,
    links: [Option<ChunkCoord>; 4],
}

#[derive(Default)]
pub struct ChunkStore {
    chunks: FxHashMap<ChunkCoord, ChunkEntry>,
}

impl ChunkStore {
    pub fn new() -> Self {
        ChunkStore {
            chunks: FxHashMap::default(),
        }
    }

    /// Allocate an empty (all-air) chunk. Fails if the coordinate is
    /// already present.
    pub fn create(&mut self, coord: ChunkCoord) -> Result<(), EngineError> {
        self.insert(coord, ChunkData::new())
    }

    /// Insert externally generated chunk data with `create` semantics.
    pub fn insert(&mut self, coord: ChunkCoord, data: ChunkData) -> Result<(), EngineError> {
        if self.chunks.contains_key(&coord) {
            return Err(EngineError::ChunkAlreadyPresent(coord));
        }
        self.chunks.insert(
            coord,
            ChunkEntry {
                data,
                links: [None; 4],
            },
        );
        Ok(())
    }

    /// Fill every cell of an existing chunk from a local-coordinate
    /// generator function.
    pub fn populate<F>(&mut self, coord: ChunkCoord, f: F)
    where
        F: FnMut(i32, i32, i32) -> BlockType,
    {
        if let Some(entry) = self.chunks.get_mut(&coord) {
            entry.data.fill_with(f);
        }
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunks.keys().copied()
    }

    pub fn data(&self, coord: ChunkCoord) -> Option<&ChunkData> {
        self.chunks.get(&coord).map(|e| &e.data)
    }

    pub fn data_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkData> {
        self.chunks.get_mut(&coord).map(|e| &mut e.data)
    }

    /// Current link of `coord` in the given direction.
    pub fn neighbor_link(&self, coord: ChunkCoord, dir: Direction) -> Option<ChunkCoord> {
        self.chunks.get(&coord).and_then(|e| e.links[dir.index()])
    }

    /// Wire reciprocal links to every present cardinal neighbor. Returns
    /// the coordinates whose boundary faces may have changed (this chunk
    /// plus each newly linked neighbor) so callers can mark them for
    /// remeshing.
    pub fn link_neighbors(&mut self, coord: ChunkCoord) -> Vec<ChunkCoord> {
        let mut touched = Vec::new();
        if !self.chunks.contains_key(&coord) {
            return touched;
        }

        for dir in Direction::ALL {
            let ncoord = coord.neighbor(dir);
            if !self.chunks.contains_key(&ncoord) {
                continue;
            }
            if let Some(entry) = self.chunks.get_mut(&coord) {
                entry.links[dir.index()] = Some(ncoord);
            }
            if let Some(neighbor) = self.chunks.get_mut(&ncoord) {
                neighbor.links[dir.opposite().index()] = Some(coord);
            }
            touched.push(ncoord);
        }

        touched.push(coord);
        touched
    }

    /// Clear every reciprocal link touching `coord` so no dangling
    /// references survive a destroy.
    pub fn unlink(&mut self, coord: ChunkCoord) {
        let links = match self.chunks.get_mut(&coord) {
            Some(entry) => std::mem::take(&mut entry.links),
            None => return,
        };
        for (i, link) in links.iter().enumerate() {
            if let Some(ncoord) = link {
                let opposite = Direction::ALL[i].opposite();
                if let Some(neighbor) = self.chunks.get_mut(ncoord) {
                    neighbor.links[opposite.index()] = None;
                }
            }
        }
    }

    /// Block lookup with neighbor-aware horizontal resolution. Local
    /// coordinates outside `[0, CHUNK_SIZE)` delegate through the adjacency
    /// links; vertical coordinates outside `[0, CHUNK_HEIGHT)` and lookups
    /// across a missing link both return `None`, which callers treat as air.
    pub fn block_at(
        &self,
        coord: ChunkCoord,
        local_x: i32,
        local_y: i32,
        local_z: i32,
    ) -> Option<BlockType> {
        let entry = self.chunks.get(&coord)?;

        if local_y < 0 || local_y >= CHUNK_HEIGHT {
            return None;
        }

        if local_x < 0 {
            let n = entry.links[Direction::West.index()]?;
            return self.block_at(n, local_x + CHUNK_SIZE, local_y, local_z);
        }
        if local_x >= CHUNK_SIZE {
            let n = entry.links[Direction::East.index()]?;
            return self.block_at(n, local_x - CHUNK_SIZE, local_y, local_z);
        }
        if local_z < 0 {
            let n = entry.links[Direction::South.index()]?;
            return self.block_at(n, local_x, local_y, local_z + CHUNK_SIZE);
        }
        if local_z >= CHUNK_SIZE {
            let n = entry.links[Direction::North.index()]?;
            return self.block_at(n, local_x, local_y, local_z - CHUNK_SIZE);
        }

        Some(entry.data.get(local_x, local_y, local_z))
    }

    /// Highest non-decoration solid block in the column, scanning top-down.
    /// Decoration blocks are excluded so tree trunks don't register as
    /// ground. Delegates through neighbor links for out-of-bounds columns;
    /// returns 0 for empty or unreachable columns.
    pub fn ground_level_at(&self, coord: ChunkCoord, local_x: i32, local_z: i32) -> i32 {
        let Some(entry) = self.chunks.get(&coord) else {
            return 0;
        };

        if local_x < 0 {
            return match entry.links[Direction::West.index()] {
                Some(n) => self.ground_level_at(n, local_x + CHUNK_SIZE, local_z),
                None => 0,
            };
        }
        if local_x >= CHUNK_SIZE {
            return match entry.links[Direction::East.index()] {
                Some(n) => self.ground_level_at(n, local_x - CHUNK_SIZE, local_z),
                None => 0,
            };
        }
        if local_z < 0 {
            return match entry.links[Direction::South.index()] {
                Some(n) => self.ground_level_at(n, local_x, local_z + CHUNK_SIZE),
                None => 0,
            };
        }
        if local_z >= CHUNK_SIZE {
            return match entry.links[Direction::North.index()] {
                Some(n) => self.ground_level_at(n, local_x, local_z - CHUNK_SIZE),
                None => 0,
            };
        }

        for y in (0..CHUNK_HEIGHT).rev() {
            let block = entry.data.get(local_x, y, local_z);
            if block.is_solid() && !block.is_decoration() {
                return y;
            }
        }
        0
    }

    /// Unlink and free the chunk. Returns whether anything was removed.
    pub fn destroy(&mut self, coord: ChunkCoord) -> bool {
        self.unlink(coord);
        self.chunks.remove(&coord).is_some()
    }
}
