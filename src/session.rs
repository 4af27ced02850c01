//! Top-level engine handle.
//!
//! A `WorldSession` owns the streaming controller plus a terrain field for
//! synchronous point queries (spawn placement, camera ground checks) that
//! must not wait for chunk generation.

use glam::Vec3;

use crate::config::WorldConfig;
use crate::core::block::BlockType;
use crate::core::chunk::ChunkCoord;
use crate::error::EngineError;
use crate::render::RenderBackend;
use crate::streaming::StreamingController;
use crate::world::terrain::TerrainField;

pub struct WorldSessionBuilder {
    config: WorldConfig,
    backend: Option<Box<dyn RenderBackend>>,
}

impl WorldSessionBuilder {
    pub fn new() -> Self {
        WorldSessionBuilder {
            config: WorldConfig::default(),
            backend: None,
        }
    }

    pub fn config(mut self, config: WorldConfig) -> Self {
        self.config = config;
        self
    }

    pub fn seed(mut self, seed: u32) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn render_backend(mut self, backend: Box<dyn RenderBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn build(self) -> Result<WorldSession, EngineError> {
        self.config.validate()?;
        let backend = self.backend.ok_or(EngineError::MissingRenderBackend)?;
        let terrain = TerrainField::new(self.config.seed);
        Ok(WorldSession {
            controller: StreamingController::new(self.config, backend),
            terrain,
        })
    }
}

impl Default for WorldSessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct WorldSession {
    controller: StreamingController,
    terrain: TerrainField,
}

impl WorldSession {
    pub fn builder() -> WorldSessionBuilder {
        WorldSessionBuilder::new()
    }

    /// Advance one streaming tick with the observer at a continuous world
    /// position.
    pub fn tick(&mut self, observer: Vec3) {
        self.controller.tick(ChunkCoord::from_world(observer));
    }

    /// Tick until all streaming work settles or the limit runs out.
    pub fn settle(&mut self, observer: Vec3, max_ticks: usize) -> bool {
        self.controller
            .settle(ChunkCoord::from_world(observer), max_ticks)
    }

    /// Take the mesh-ready notification stream (one event per applied
    /// mesh). Can be taken once.
    pub fn subscribe_mesh_ready(
        &mut self,
    ) -> Option<crossbeam_channel::Receiver<ChunkCoord>> {
        self.controller.subscribe_mesh_ready()
    }

    /// Terrain surface height at a world column, independent of whether
    /// the chunk is resident.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        self.terrain.surface_height(world_x, world_z)
    }

    /// Block at a world position, if its chunk is resident. Decorations
    /// are only visible here once the chunk has been generated.
    pub fn block_at(&self, world_x: i32, world_y: i32, world_z: i32) -> Option<BlockType> {
        let coord = ChunkCoord::from_world(Vec3::new(world_x as f32, 0.0, world_z as f32));
        let origin = coord.world_origin();
        let store = self.controller.store();
        let store = store.read();
        store.block_at(
            coord,
            world_x - origin.x as i32,
            world_y,
            world_z - origin.z as i32,
        )
    }

    pub fn observer_chunk(&self) -> ChunkCoord {
        self.controller.observer_chunk()
    }

    pub fn config(&self) -> &WorldConfig {
        self.controller.config()
    }

    pub fn resident_count(&self) -> usize {
        self.controller.resident_count()
    }

    pub fn meshed_count(&self) -> usize {
        self.controller.meshed_count()
    }

    pub fn collider_count(&self) -> usize {
        self.controller.collider_count()
    }
}
