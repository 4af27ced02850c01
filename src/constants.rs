// World constants
pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_HEIGHT: i32 = 128;
pub const LOAD_RADIUS: i32 = 10;
pub const VIEW_RADIUS: i32 = 8;
pub const SIMULATION_RADIUS: i32 = 2;
// Extra ring past the load radius before chunk data is actually freed,
// so small observer oscillations don't thrash generation.
pub const DESTROY_MARGIN: i32 = 2;

// Terrain constants
pub const BIOME_FREQUENCY: f32 = 0.008;
pub const BIOME_BLEND_MARGIN: f32 = 0.05;
pub const SNOW_LINE: i32 = 96;
pub const DIRT_DEPTH: i32 = 4;

// Texture atlas
pub const ATLAS_GRID: u32 = 5;
pub const UV_PADDING: f32 = 0.001;

// Decoration constants
pub const TREE_NOISE_FREQUENCY: f32 = 0.12;
pub const TREE_SPACING: i32 = 4;
pub const TREE_EDGE_MARGIN: i32 = 2;

// Scheduling constants
pub const MESH_APPLIES_PER_TICK: usize = 2;
pub const COLLIDER_APPLIES_PER_TICK: usize = 1;
pub const GEN_APPLIES_PER_TICK: usize = 4;
pub const GEN_WORKER_COUNT: usize = 4;
