//! Procedural world generation: biome selection, terrain height field,
//! chunk data storage with neighbor adjacency, and tree decoration.

pub mod biome;
pub mod decor;
pub mod generator;
pub mod loader;
pub mod store;
pub mod terrain;

pub use biome::{Biome, BiomeField};
pub use generator::ChunkGenerator;
pub use loader::{ChunkLoader, GenResult};
pub use store::ChunkStore;
pub use terrain::TerrainField;

use fastnoise_lite::FastNoiseLite;

/// Perlin sample remapped from [-1, 1] to [0, 1].
pub(crate) fn perlin01(noise: &FastNoiseLite, x: f32, z: f32) -> f32 {
    (noise.get_noise_2d(x, z) + 1.0) * 0.5
}

pub(crate) fn inverse_lerp(a: f32, b: f32, v: f32) -> f32 {
    if (b - a).abs() <= f32::EPSILON {
        0.0
    } else {
        (v - a) / (b - a)
    }
}

pub(crate) fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
