//! Radius-based chunk streaming around a moving observer.
//!
//! Three nested Chebyshev radii drive everything: chunk data is resident
//! within the load radius, meshes exist within the view radius, and
//! colliders within the simulation radius. Data is only freed beyond the
//! load radius plus a margin so small observer oscillations don't thrash
//! generation. One `tick` advances every lifecycle stage by a bounded
//! amount of work.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::config::WorldConfig;
use crate::core::chunk::ChunkCoord;
use crate::mesh::loader::MeshLoader;
use crate::render::{MeshHandle, RenderBackend};
use crate::scheduler::ApplyScheduler;
use crate::world::loader::ChunkLoader;
use crate::world::store::ChunkStore;

/// Per-chunk render state. The store holds block data; everything the
/// backend knows about a chunk lives here.
pub struct ChunkView {
    pub mesh: Option<MeshHandle>,
    pub collider: Option<MeshHandle>,
    pub requires_collider: bool,
    /// Set when block data or adjacency changed since the last mesh
    /// request for this chunk.
    pub mesh_dirty: bool,
}

pub struct StreamingController {
    config: WorldConfig,
    store: Arc<RwLock<ChunkStore>>,
    views: FxHashMap<ChunkCoord, ChunkView>,
    gen_loader: ChunkLoader,
    mesh_loader: MeshLoader,
    scheduler: ApplyScheduler,
    backend: Box<dyn RenderBackend>,
    meshing_in_flight: FxHashSet<ChunkCoord>,
    observer_chunk: ChunkCoord,
}

impl StreamingController {
    pub fn new(config: WorldConfig, backend: Box<dyn RenderBackend>) -> Self {
        let store = Arc::new(RwLock::new(ChunkStore::new()));
        let scheduler = ApplyScheduler::new(
            config.mesh_applies_per_tick,
            config.collider_applies_per_tick,
        );

        let gen_loader = ChunkLoader::new(config.seed, config.gen_workers);
        let mesh_loader = MeshLoader::new(
            Arc::clone(&store),
            scheduler.mesh_sender(),
            config.mesh_workers,
        );

        info!(
            seed = config.seed,
            load = config.load_radius,
            view = config.view_radius,
            simulation = config.simulation_radius,
            gen_workers = gen_loader.worker_count(),
            mesh_workers = mesh_loader.worker_count(),
            "streaming controller started"
        );

        StreamingController {
            config,
            store,
            views: FxHashMap::default(),
            gen_loader,
            mesh_loader,
            scheduler,
            backend,
            meshing_in_flight: FxHashSet::default(),
            observer_chunk: ChunkCoord::new(0, 0),
        }
    }

    /// Advance one streaming tick with the observer in the given chunk.
    pub fn tick(&mut self, observer: ChunkCoord) {
        self.observer_chunk = observer;

        self.drain_generated();
        self.unload_meshes();
        self.destroy_far();
        self.request_generation();
        self.request_meshes();

        let report = self.scheduler.drain(&mut self.views, self.backend.as_mut());
        for coord in report.applied.iter().chain(&report.discarded) {
            self.meshing_in_flight.remove(coord);
        }

        self.update_simulation_flags();
    }

    /// Insert finished generation results, up to the per-tick budget.
    fn drain_generated(&mut self) {
        let results = self.gen_loader.poll(self.config.gen_applies_per_tick);
        for result in results {
            if result.coord.chebyshev(self.observer_chunk) > self.config.load_radius {
                debug!(coord = %result.coord, "dropping out-of-range generation result");
                continue;
            }

            let touched = {
                let mut store = self.store.write();
                if store.insert(result.coord, result.data).is_err() {
                    continue;
                }
                store.link_neighbors(result.coord)
            };

            // new adjacency exposes or hides boundary faces on every
            // linked neighbor
            for coord in &touched {
                if let Some(view) = self.views.get_mut(coord) {
                    view.mesh_dirty = true;
                }
            }

            let within_sim =
                result.coord.chebyshev(self.observer_chunk) <= self.config.simulation_radius;
            self.views.insert(
                result.coord,
                ChunkView {
                    mesh: None,
                    collider: None,
                    requires_collider: within_sim,
                    mesh_dirty: true,
                },
            );
        }
    }

    /// Drop meshes (and their colliders) for chunks that left the view
    /// radius. Data stays resident.
    fn unload_meshes(&mut self) {
        for (&coord, view) in self.views.iter_mut() {
            if coord.chebyshev(self.observer_chunk) <= self.config.view_radius {
                continue;
            }
            if let Some(handle) = view.mesh.take() {
                if view.collider.take().is_some() {
                    self.backend.detach_collider(coord);
                }
                self.backend.drop_mesh(coord, handle);
                view.mesh_dirty = true;
            }
        }
    }

    /// Free chunk data beyond the load radius plus the destroy margin.
    fn destroy_far(&mut self) {
        let limit = self.config.load_radius + self.config.destroy_margin;
        let far: Vec<ChunkCoord> = self
            .views
            .keys()
            .copied()
            .filter(|c| c.chebyshev(self.observer_chunk) > limit)
            .collect();

        if far.is_empty() {
            return;
        }

        let mut store = self.store.write();
        for coord in far {
            store.destroy(coord);
            if let Some(view) = self.views.remove(&coord) {
                if view.collider.is_some() {
                    self.backend.detach_collider(coord);
                }
                if let Some(handle) = view.mesh {
                    self.backend.drop_mesh(coord, handle);
                }
            }
            self.meshing_in_flight.remove(&coord);
        }
    }

    /// Queue generation for every missing chunk in the load radius,
    /// nearest first.
    fn request_generation(&mut self) {
        let store = self.store.read();
        let mut wanted = Vec::new();
        for dx in -self.config.load_radius..=self.config.load_radius {
            for dz in -self.config.load_radius..=self.config.load_radius {
                let coord =
                    ChunkCoord::new(self.observer_chunk.x + dx, self.observer_chunk.z + dz);
                if !store.contains(coord) && !self.gen_loader.is_pending(coord) {
                    wanted.push((coord, coord.dist_sq(self.observer_chunk)));
                }
            }
        }
        drop(store);

        if !wanted.is_empty() {
            self.gen_loader.request_batch(&wanted);
        }
    }

    /// Queue meshing for every resident chunk in the view radius whose
    /// mesh is missing or stale.
    fn request_meshes(&mut self) {
        for dx in -self.config.view_radius..=self.config.view_radius {
            for dz in -self.config.view_radius..=self.config.view_radius {
                let coord =
                    ChunkCoord::new(self.observer_chunk.x + dx, self.observer_chunk.z + dz);
                if self.meshing_in_flight.contains(&coord) {
                    continue;
                }
                let Some(view) = self.views.get_mut(&coord) else {
                    continue;
                };
                if view.mesh.is_some() && !view.mesh_dirty {
                    continue;
                }
                if self.mesh_loader.request(coord) {
                    self.meshing_in_flight.insert(coord);
                    view.mesh_dirty = false;
                }
            }
        }
    }

    /// Reconcile collider requirements with the simulation radius. Runs
    /// after the drain so freshly applied meshes get colliders queued the
    /// same tick.
    fn update_simulation_flags(&mut self) {
        for (&coord, view) in self.views.iter_mut() {
            let within = coord.chebyshev(self.observer_chunk) <= self.config.simulation_radius;
            if within && !view.requires_collider {
                view.requires_collider = true;
                if view.mesh.is_some() {
                    self.scheduler.queue_collider(coord);
                }
            } else if !within && view.requires_collider {
                view.requires_collider = false;
                if view.collider.take().is_some() {
                    self.backend.detach_collider(coord);
                }
            }
        }
    }

    /// True when no work is pending anywhere and the resident state fully
    /// matches the configured radii.
    pub fn is_quiescent(&self) -> bool {
        if self.gen_loader.pending_count() > 0
            || !self.meshing_in_flight.is_empty()
            || self.scheduler.pending_meshes() > 0
            || self.scheduler.pending_colliders() > 0
        {
            return false;
        }

        let store = self.store.read();
        for dx in -self.config.load_radius..=self.config.load_radius {
            for dz in -self.config.load_radius..=self.config.load_radius {
                let coord =
                    ChunkCoord::new(self.observer_chunk.x + dx, self.observer_chunk.z + dz);
                if !store.contains(coord) {
                    return false;
                }
                let dist = coord.chebyshev(self.observer_chunk);
                let Some(view) = self.views.get(&coord) else {
                    return false;
                };
                if dist <= self.config.view_radius && (view.mesh.is_none() || view.mesh_dirty) {
                    return false;
                }
                if dist <= self.config.simulation_radius && view.collider.is_none() {
                    return false;
                }
            }
        }
        true
    }

    /// Tick until quiescent or the tick limit runs out.
    pub fn settle(&mut self, observer: ChunkCoord, max_ticks: usize) -> bool {
        for _ in 0..max_ticks {
            self.tick(observer);
            if self.is_quiescent() {
                return true;
            }
            thread::sleep(Duration::from_millis(1));
        }
        false
    }

    pub fn subscribe_mesh_ready(&mut self) -> Option<Receiver<ChunkCoord>> {
        self.scheduler.subscribe_mesh_ready()
    }

    pub fn observer_chunk(&self) -> ChunkCoord {
        self.observer_chunk
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<RwLock<ChunkStore>> {
        Arc::clone(&self.store)
    }

    pub fn resident_count(&self) -> usize {
        self.store.read().len()
    }

    pub fn meshed_count(&self) -> usize {
        self.views.values().filter(|v| v.mesh.is_some()).count()
    }

    pub fn collider_count(&self) -> usize {
        self.views.values().filter(|v| v.collider.is_some()).count()
    }
}
