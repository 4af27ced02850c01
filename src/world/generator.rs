//! Full chunk generation: terrain fill plus decoration.

use crate::constants::*;
use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::decor::TreePlanter;
use crate::world::terrain::TerrainField;

/// Produces complete chunk data for any coordinate. Generation is a pure
/// function of (seed, coord), so every worker can hold its own generator
/// and chunks come out identical regardless of who generated them.
pub struct ChunkGenerator {
    terrain: TerrainField,
    trees: TreePlanter,
    pub seed: u32,
}

impl ChunkGenerator {
    pub fn new(seed: u32) -> Self {
        ChunkGenerator {
            terrain: TerrainField::new(seed),
            trees: TreePlanter::new(seed),
            seed,
        }
    }

    pub fn terrain(&self) -> &TerrainField {
        &self.terrain
    }

    pub fn generate(&self, coord: ChunkCoord) -> ChunkData {
        let base_x = coord.x * CHUNK_SIZE;
        let base_z = coord.z * CHUNK_SIZE;

        // hoist the per-column noise work out of the y loop
        let mut surface = [[0i32; CHUNK_SIZE as usize]; CHUNK_SIZE as usize];
        let mut biome = [[crate::world::biome::Biome::Plains; CHUNK_SIZE as usize];
            CHUNK_SIZE as usize];
        for lx in 0..CHUNK_SIZE {
            for lz in 0..CHUNK_SIZE {
                let wx = base_x + lx;
                let wz = base_z + lz;
                surface[lx as usize][lz as usize] = self.terrain.surface_height(wx, wz);
                biome[lx as usize][lz as usize] = self.terrain.dominant_biome(wx, wz);
            }
        }

        let mut data = ChunkData::new();
        data.fill_with(|x, y, z| {
            TerrainField::classify(
                biome[x as usize][z as usize],
                y,
                surface[x as usize][z as usize],
            )
        });

        self.trees.decorate(&mut data, coord, &self.terrain);
        data
    }
}

impl Clone for ChunkGenerator {
    fn clone(&self) -> Self {
        ChunkGenerator::new(self.seed)
    }
}
