//! Biome selection as a continuous weight field.
//!
//! Biomes are a closed set of parameter bundles selected per world column.
//! Instead of hard-switching at threshold borders, every registered biome
//! gets a smooth weight and terrain blends the weighted parameter sets,
//! which keeps elevation and surface blocks seam-free across borders.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use tracing::warn;

use crate::constants::*;
use crate::core::block::BlockType;
use crate::world::{inverse_lerp, perlin01, smoothstep};

/// Closed set of biome variants. Behavior lives in the static parameter
/// table below, not in per-variant code.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Biome {
    Plains,
    OakForest,
    DarkForest,
    Mountains,
    SnowyPeaks,
}

/// Per-biome noise and decoration parameters. All values are fixed at
/// compile time; biomes are stateless.
pub struct BiomeParams {
    pub base_frequency: f32,
    pub base_strength: f32,
    pub mountain_frequency: f32,
    pub mountain_strength: f32,
    pub variation_frequency: f32,
    pub variation_strength: f32,
    pub height_offset: f32,
    pub snowy_surface: bool,
    pub trees: Option<TreeParams>,
}

pub struct TreeParams {
    pub spawn_threshold: f32,
    pub min_height: i32,
    pub height_variation: i32,
}

const PLAINS: BiomeParams = BiomeParams {
    base_frequency: 0.004,
    base_strength: 8.0,
    mountain_frequency: 0.008,
    mountain_strength: 2.0,
    variation_frequency: 0.012,
    variation_strength: 4.0,
    height_offset: 38.0,
    snowy_surface: false,
    trees: Some(TreeParams {
        spawn_threshold: 0.8,
        min_height: 4,
        height_variation: 3,
    }),
};

const OAK_FOREST: BiomeParams = BiomeParams {
    base_frequency: 0.005,
    base_strength: 10.0,
    mountain_frequency: 0.001,
    mountain_strength: 4.0,
    variation_frequency: 0.015,
    variation_strength: 6.0,
    height_offset: 42.0,
    snowy_surface: false,
    trees: Some(TreeParams {
        spawn_threshold: 0.5,
        min_height: 5,
        height_variation: 3,
    }),
};

const DARK_FOREST: BiomeParams = BiomeParams {
    base_frequency: 0.006,
    base_strength: 12.0,
    mountain_frequency: 0.003,
    mountain_strength: 5.0,
    variation_frequency: 0.025,
    variation_strength: 3.0,
    height_offset: 46.0,
    snowy_surface: false,
    trees: Some(TreeParams {
        spawn_threshold: 0.52,
        min_height: 6,
        height_variation: 3,
    }),
};

const MOUNTAINS: BiomeParams = BiomeParams {
    base_frequency: 0.006,
    base_strength: 16.0,
    mountain_frequency: 0.001,
    mountain_strength: 18.0,
    variation_frequency: 0.02,
    variation_strength: 10.0,
    height_offset: 52.0,
    snowy_surface: false,
    trees: Some(TreeParams {
        spawn_threshold: 0.6,
        min_height: 4,
        height_variation: 3,
    }),
};

const SNOWY_PEAKS: BiomeParams = BiomeParams {
    base_frequency: 0.01,
    base_strength: 16.0,
    mountain_frequency: 0.01,
    mountain_strength: 50.0,
    variation_frequency: 0.03,
    variation_strength: 4.0,
    height_offset: 64.0,
    snowy_surface: true,
    trees: None,
};

impl Biome {
    pub fn params(&self) -> &'static BiomeParams {
        match self {
            Biome::Plains => &PLAINS,
            Biome::OakForest => &OAK_FOREST,
            Biome::DarkForest => &DARK_FOREST,
            Biome::Mountains => &MOUNTAINS,
            Biome::SnowyPeaks => &SNOWY_PEAKS,
        }
    }

    /// Surface block for a column topping out at `surface` world height.
    pub fn surface_block(&self, surface: i32) -> BlockType {
        if self.params().snowy_surface || surface >= SNOW_LINE {
            BlockType::Snow
        } else {
            BlockType::Grass
        }
    }
}

/// Selector window on the [0, 1] noise range. Registration order defines
/// tie-break priority for dominant-biome selection.
#[derive(Clone, Copy)]
pub struct BiomeWindow {
    pub biome: Biome,
    pub start: f32,
    pub end: f32,
}

/// Pure function from world (x, z) + seed to a normalized weight
/// distribution over all registered biomes.
pub struct BiomeField {
    selector: FastNoiseLite,
    blend: FastNoiseLite,
    windows: Vec<BiomeWindow>,
}

impl BiomeField {
    pub fn new(seed: u32) -> Self {
        Self::with_windows(
            seed,
            vec![
                BiomeWindow { biome: Biome::Plains, start: 0.0, end: 0.40 },
                BiomeWindow { biome: Biome::OakForest, start: 0.40, end: 0.65 },
                BiomeWindow { biome: Biome::DarkForest, start: 0.65, end: 0.80 },
                BiomeWindow { biome: Biome::Mountains, start: 0.80, end: 0.95 },
                BiomeWindow { biome: Biome::SnowyPeaks, start: 0.95, end: 1.0 },
            ],
        )
    }

    pub fn with_windows(seed: u32, windows: Vec<BiomeWindow>) -> Self {
        debug_assert!(!windows.is_empty(), "biome registry must not be empty");

        let mut selector = FastNoiseLite::with_seed(seed as i32);
        selector.set_noise_type(Some(NoiseType::Perlin));
        selector.set_frequency(Some(BIOME_FREQUENCY));

        let mut blend = FastNoiseLite::with_seed(seed.wrapping_add(5) as i32);
        blend.set_noise_type(Some(NoiseType::Perlin));
        blend.set_frequency(Some(0.005));

        BiomeField {
            selector,
            blend,
            windows,
        }
    }

    /// First-registered biome, used when the weight field degenerates.
    pub fn default_biome(&self) -> Biome {
        self.windows[0].biome
    }

    /// Normalized weights over all registered biomes: every weight >= 0 and
    /// the sum is 1. Order matches registration order.
    pub fn weights(&self, world_x: i32, world_z: i32) -> Vec<(Biome, f32)> {
        let fx = world_x as f32;
        let fz = world_z as f32;

        // stretch highs so mountain windows stay reachable
        let value = perlin01(&self.selector, fx, fz).powf(1.2);
        let blend = perlin01(&self.blend, fx, fz);

        let mut out = Vec::with_capacity(self.windows.len());
        let mut sum = 0.0f32;

        for window in &self.windows {
            // smooth rise across the start band, smooth fall across the end
            // band, flat 1.0 inside the window
            let rise = smoothstep(inverse_lerp(
                window.start - BIOME_BLEND_MARGIN,
                window.start + BIOME_BLEND_MARGIN,
                value,
            ));
            let fall = smoothstep(inverse_lerp(
                window.end - BIOME_BLEND_MARGIN,
                window.end + BIOME_BLEND_MARGIN,
                value,
            ));
            let mut t = rise * (1.0 - fall);

            // subtle noise wobble keeps borders organic
            t = (t * (0.85 + blend * 0.3)).clamp(0.0, 1.0);

            sum += t;
            out.push((window.biome, t));
        }

        if sum <= f32::EPSILON {
            warn!(
                world_x,
                world_z, "degenerate biome weights, falling back to default biome"
            );
            out.clear();
            out.push((self.default_biome(), 1.0));
            return out;
        }

        for (_, w) in out.iter_mut() {
            *w /= sum;
        }
        out
    }

    /// Highest-weight biome; the first-registered biome wins exact ties.
    pub fn dominant(&self, world_x: i32, world_z: i32) -> Biome {
        let weights = self.weights(world_x, world_z);
        let mut best = weights[0];
        for &cand in &weights[1..] {
            if cand.1 > best.1 {
                best = cand;
            }
        }
        best.0
    }
}
