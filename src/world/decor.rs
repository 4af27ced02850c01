//! Biome decoration: tree placement on freshly generated chunks.
//!
//! Trees are chunk-local by construction (trunks keep a margin from the
//! chunk edge and canopies are clipped to the chunk), so decoration never
//! needs neighbor data and never creates overhangs below a column's ground
//! level. That keeps the mesher's underground side-face culling valid.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::biome::TreeParams;
use crate::world::perlin01;
use crate::world::terrain::TerrainField;

pub struct TreePlanter {
    gate: FastNoiseLite,
    growth: FastNoiseLite,
}

impl TreePlanter {
    pub fn new(seed: u32) -> Self {
        let mut gate = FastNoiseLite::with_seed(seed.wrapping_add(7) as i32);
        gate.set_noise_type(Some(NoiseType::Perlin));
        gate.set_frequency(Some(TREE_NOISE_FREQUENCY));

        let mut growth = FastNoiseLite::with_seed(seed.wrapping_add(8) as i32);
        growth.set_noise_type(Some(NoiseType::Perlin));
        growth.set_frequency(Some(0.09));

        TreePlanter { gate, growth }
    }

    /// Walk every column of the chunk and plant a tree where the biome
    /// allows it, the gate noise clears the biome threshold, and no other
    /// trunk sits within the spacing window.
    pub fn decorate(&self, data: &mut ChunkData, coord: ChunkCoord, terrain: &TerrainField) {
        let base_x = coord.x * CHUNK_SIZE;
        let base_z = coord.z * CHUNK_SIZE;
        let mut trunks: Vec<(i32, i32)> = Vec::new();

        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                if trunks
                    .iter()
                    .any(|&(tx, tz)| (tx - lx).abs().max((tz - lz).abs()) <= TREE_SPACING)
                {
                    continue;
                }

                let world_x = base_x + lx;
                let world_z = base_z + lz;

                let biome = terrain.dominant_biome(world_x, world_z);
                let Some(tree) = &biome.params().trees else {
                    continue;
                };

                let gate = perlin01(&self.gate, world_x as f32, world_z as f32);
                if gate <= tree.spawn_threshold {
                    continue;
                }

                if self.place_tree(data, lx, lz, world_x, world_z, terrain, tree) {
                    trunks.push((lx, lz));
                }
            }
        }
    }

    fn place_tree(
        &self,
        data: &mut ChunkData,
        lx: i32,
        lz: i32,
        world_x: i32,
        world_z: i32,
        terrain: &TerrainField,
        tree: &TreeParams,
    ) -> bool {
        // keep the whole canopy inside the chunk
        if lx < TREE_EDGE_MARGIN
            || lx > CHUNK_SIZE - 1 - TREE_EDGE_MARGIN
            || lz < TREE_EDGE_MARGIN
            || lz > CHUNK_SIZE - 1 - TREE_EDGE_MARGIN
        {
            return false;
        }

        let surface = terrain.surface_height(world_x, world_z);
        if data.get(lx, surface, lz) != BlockType::Grass {
            return false;
        }

        let growth = perlin01(&self.growth, world_x as f32, world_z as f32);
        let height = tree.min_height + (tree.height_variation as f32 * growth) as i32;

        for dy in 1..=height {
            let y = surface + dy;
            if y >= CHUNK_HEIGHT {
                break;
            }
            data.set(lx, y, lz, BlockType::Wood);
        }

        self.place_canopy(data, lx, surface + height, lz);
        true
    }

    fn place_canopy(&self, data: &mut ChunkData, cx: i32, cy: i32, cz: i32) {
        // top layer: 3x3 around the trunk tip
        for dx in -1..=1 {
            for dz in -1..=1 {
                Self::leaf(data, cx + dx, cy, cz + dz);
            }
        }

        // layer below: 5x5 with the corners dropped
        for dx in -2..=2i32 {
            for dz in -2..=2i32 {
                if dx.abs() == 2 && dz.abs() == 2 {
                    continue;
                }
                Self::leaf(data, cx + dx, cy - 1, cz + dz);
            }
        }
    }

    // leaves only ever fill air, clipped to the chunk
    fn leaf(data: &mut ChunkData, x: i32, y: i32, z: i32) {
        if ChunkData::in_bounds(x, y, z) && data.get(x, y, z) == BlockType::Air {
            data.set(x, y, z, BlockType::Leaves);
        }
    }
}
