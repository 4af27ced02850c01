//! Deterministic terrain height field and block classifier.
//!
//! Heights are a weighted sum of per-biome candidates using the normalized
//! biome weights, so biome borders blend in elevation as well as in surface
//! block choice. Every function here is pure in (seed, coordinates): chunks
//! generated independently meet seamlessly at their boundaries.

use fastnoise_lite::{FastNoiseLite, NoiseType};

use crate::constants::*;
use crate::core::block::BlockType;
use crate::world::biome::{Biome, BiomeField};
use crate::world::perlin01;

pub struct TerrainField {
    biomes: BiomeField,
    base: FastNoiseLite,
    ridge: FastNoiseLite,
    detail: FastNoiseLite,
    pub seed: u32,
}

impl TerrainField {
    pub fn new(seed: u32) -> Self {
        TerrainField {
            biomes: BiomeField::new(seed),
            base: Self::unit_perlin(seed),
            ridge: Self::unit_perlin(seed.wrapping_add(1)),
            detail: Self::unit_perlin(seed.wrapping_add(2)),
            seed,
        }
    }

    // Frequency 1.0 so per-biome frequencies can scale the coordinates;
    // octave decorrelation comes from the per-instance seeds.
    fn unit_perlin(seed: u32) -> FastNoiseLite {
        let mut noise = FastNoiseLite::with_seed(seed as i32);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0));
        noise
    }

    /// Surface height of the column at (x, z), clamped to
    /// `[1, CHUNK_HEIGHT - 2]`.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        let fx = world_x as f32;
        let fz = world_z as f32;

        let mut height = 0.0f32;
        for (biome, weight) in self.biomes.weights(world_x, world_z) {
            let p = biome.params();

            let base = perlin01(&self.base, fx * p.base_frequency, fz * p.base_frequency);
            // folded noise gives ridge-like silhouettes instead of domes
            let ridge = (perlin01(
                &self.ridge,
                fx * p.mountain_frequency,
                fz * p.mountain_frequency,
            ) - 0.5)
                .abs()
                * 2.0;
            let detail = perlin01(
                &self.detail,
                fx * p.variation_frequency,
                fz * p.variation_frequency,
            );

            let candidate = base * p.base_strength
                + ridge * p.mountain_strength
                + detail * p.variation_strength
                + p.height_offset;
            height += weight * candidate;
        }

        (height.floor() as i32).clamp(1, CHUNK_HEIGHT - 2)
    }

    /// Block type at an arbitrary world coordinate.
    pub fn block_type_at(&self, world_x: i32, world_z: i32, y: i32) -> BlockType {
        let surface = self.surface_height(world_x, world_z);
        let biome = self.dominant_biome(world_x, world_z);
        Self::classify(biome, y, surface)
    }

    /// Column classification shared by point queries and bulk chunk
    /// generation, so both paths stay bit-identical.
    pub fn classify(biome: Biome, y: i32, surface: i32) -> BlockType {
        if y > surface {
            BlockType::Air
        } else if y == surface {
            biome.surface_block(surface)
        } else if y >= surface - DIRT_DEPTH {
            BlockType::Dirt
        } else {
            BlockType::Stone
        }
    }

    pub fn dominant_biome(&self, world_x: i32, world_z: i32) -> Biome {
        self.biomes.dominant(world_x, world_z)
    }

    pub fn biome_field(&self) -> &BiomeField {
        &self.biomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surface_height_is_deterministic_across_instances() {
        let a = TerrainField::new(12345);
        let b = TerrainField::new(12345);
        for x in (-200..200).step_by(17) {
            for z in (-200..200).step_by(23) {
                assert_eq!(a.surface_height(x, z), b.surface_height(x, z));
                assert_eq!(a.block_type_at(x, z, 40), b.block_type_at(x, z, 40));
            }
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let a = TerrainField::new(1);
        let b = TerrainField::new(2);
        let differs = (-100..100)
            .step_by(5)
            .any(|x| a.surface_height(x, 0) != b.surface_height(x, 0));
        assert!(differs);
    }

    #[test]
    fn surface_height_respects_clamp_range() {
        let field = TerrainField::new(999);
        for x in (-500..500).step_by(19) {
            let h = field.surface_height(x, -x);
            assert!((1..=CHUNK_HEIGHT - 2).contains(&h), "height {} out of range", h);
        }
    }

    #[test]
    fn column_classification_layers() {
        let field = TerrainField::new(12345);
        let (x, z) = (10, 20);
        let surface = field.surface_height(x, z);
        let biome = field.dominant_biome(x, z);

        assert_eq!(field.block_type_at(x, z, surface + 1), BlockType::Air);
        assert_eq!(field.block_type_at(x, z, surface), biome.surface_block(surface));
        assert_eq!(field.block_type_at(x, z, surface - 1), BlockType::Dirt);
        assert_eq!(
            field.block_type_at(x, z, surface - DIRT_DEPTH),
            BlockType::Dirt
        );
        assert_eq!(
            field.block_type_at(x, z, surface - DIRT_DEPTH - 1),
            BlockType::Stone
        );
    }

    #[test]
    fn snowy_peaks_surface_is_snow() {
        assert_eq!(Biome::SnowyPeaks.surface_block(50), BlockType::Snow);
        // any biome turns snowy above the snow line
        assert_eq!(Biome::Plains.surface_block(SNOW_LINE), BlockType::Snow);
        assert_eq!(Biome::Plains.surface_block(SNOW_LINE - 1), BlockType::Grass);
    }
}
