//! Budgeted application of worker results on the tick thread.
//!
//! Mesh uploads and collider builds are the expensive main-thread steps,
//! so each tick applies at most a fixed number of each. Everything else
//! queues and waits for a later tick, which keeps tick time flat while
//! chunks stream in.

use std::collections::VecDeque;

use crossbeam_channel::{Receiver, Sender, unbounded};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::core::chunk::ChunkCoord;
use crate::mesh::buffer::MeshBuffer;
use crate::render::RenderBackend;
use crate::streaming::ChunkView;

/// Finished mesh coming back from a mesh worker.
pub struct MeshApply {
    pub coord: ChunkCoord,
    pub buffer: MeshBuffer,
}

/// What one drain pass did. Coordinates in both lists are no longer in
/// flight and may be re-requested.
#[derive(Default)]
pub struct DrainReport {
    pub applied: Vec<ChunkCoord>,
    pub discarded: Vec<ChunkCoord>,
    pub colliders_attached: usize,
}

pub struct ApplyScheduler {
    mesh_tx: Sender<MeshApply>,
    mesh_rx: Receiver<MeshApply>,
    collider_queue: VecDeque<ChunkCoord>,
    ready_tx: Sender<ChunkCoord>,
    ready_rx: Option<Receiver<ChunkCoord>>,
    mesh_budget: usize,
    collider_budget: usize,
}

impl ApplyScheduler {
    pub fn new(mesh_budget: usize, collider_budget: usize) -> Self {
        let (mesh_tx, mesh_rx) = unbounded();
        let (ready_tx, ready_rx) = unbounded();
        ApplyScheduler {
            mesh_tx,
            mesh_rx,
            collider_queue: VecDeque::new(),
            ready_tx,
            ready_rx: Some(ready_rx),
            mesh_budget,
            collider_budget,
        }
    }

    /// Sender handed to mesh workers.
    pub fn mesh_sender(&self) -> Sender<MeshApply> {
        self.mesh_tx.clone()
    }

    /// Take the mesh-ready notification stream. One notification is sent
    /// per applied mesh. Can be taken once; if never taken, the scheduler
    /// drops notifications itself.
    pub fn subscribe_mesh_ready(&mut self) -> Option<Receiver<ChunkCoord>> {
        self.ready_rx.take()
    }

    pub fn queue_collider(&mut self, coord: ChunkCoord) {
        if !self.collider_queue.contains(&coord) {
            self.collider_queue.push_back(coord);
        }
    }

    pub fn pending_meshes(&self) -> usize {
        self.mesh_rx.len()
    }

    pub fn pending_colliders(&self) -> usize {
        self.collider_queue.len()
    }

    /// Apply up to the per-tick budgets. Stale results (their chunk's view
    /// is gone) are discarded without consuming budget.
    pub fn drain(
        &mut self,
        views: &mut FxHashMap<ChunkCoord, ChunkView>,
        backend: &mut dyn RenderBackend,
    ) -> DrainReport {
        let mut report = DrainReport::default();

        while report.applied.len() < self.mesh_budget {
            let Ok(apply) = self.mesh_rx.try_recv() else {
                break;
            };
            let Some(view) = views.get_mut(&apply.coord) else {
                debug!(coord = %apply.coord, "discarding stale mesh result");
                report.discarded.push(apply.coord);
                continue;
            };

            let handle = backend.upload_mesh(apply.coord, &apply.buffer);
            if let Some(old) = view.mesh.replace(handle) {
                backend.drop_mesh(apply.coord, old);
            }
            let _ = self.ready_tx.send(apply.coord);

            if view.requires_collider {
                self.queue_collider(apply.coord);
            }
            report.applied.push(apply.coord);
        }

        while report.colliders_attached < self.collider_budget {
            let Some(coord) = self.collider_queue.pop_front() else {
                break;
            };
            // the chunk may have left simulation range or lost its mesh
            // while queued; skip without consuming budget
            let Some(view) = views.get_mut(&coord) else {
                continue;
            };
            if !view.requires_collider || view.collider.is_some() {
                continue;
            }
            let Some(handle) = view.mesh else {
                continue;
            };

            backend.attach_collider(coord, handle);
            view.collider = Some(handle);
            report.colliders_attached += 1;
        }

        // keep the notification channel bounded in practice when nobody
        // ever subscribed
        if let Some(rx) = &self.ready_rx {
            while rx.try_recv().is_ok() {}
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessBackend;

    fn view() -> ChunkView {
        ChunkView {
            mesh: None,
            collider: None,
            requires_collider: false,
            mesh_dirty: false,
        }
    }

    fn apply_for(coord: ChunkCoord) -> MeshApply {
        MeshApply {
            coord,
            buffer: MeshBuffer::default(),
        }
    }

    #[test]
    fn mesh_applies_respect_the_budget() {
        let mut scheduler = ApplyScheduler::new(2, 1);
        let mut views = FxHashMap::default();
        let mut backend = HeadlessBackend::default();

        let tx = scheduler.mesh_sender();
        for i in 0..5 {
            let coord = ChunkCoord::new(i, 0);
            views.insert(coord, view());
            tx.send(apply_for(coord)).unwrap();
        }

        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.applied.len(), 2);
        assert_eq!(backend.uploads, 2);

        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.applied.len(), 2);
        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.applied.len(), 1);
        assert_eq!(backend.uploads, 5);
    }

    #[test]
    fn stale_results_are_discarded_without_budget() {
        let mut scheduler = ApplyScheduler::new(1, 1);
        let mut views = FxHashMap::default();
        let mut backend = HeadlessBackend::default();

        let live = ChunkCoord::new(0, 0);
        views.insert(live, view());

        let tx = scheduler.mesh_sender();
        tx.send(apply_for(ChunkCoord::new(9, 9))).unwrap();
        tx.send(apply_for(live)).unwrap();

        // the stale result is in front of the live one, but both drain in
        // a single pass under a budget of one apply
        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.discarded, vec![ChunkCoord::new(9, 9)]);
        assert_eq!(report.applied, vec![live]);
        assert_eq!(backend.uploads, 1);
    }

    #[test]
    fn reupload_drops_the_old_handle() {
        let mut scheduler = ApplyScheduler::new(2, 1);
        let mut views = FxHashMap::default();
        let mut backend = HeadlessBackend::default();

        let coord = ChunkCoord::new(0, 0);
        views.insert(coord, view());

        let tx = scheduler.mesh_sender();
        tx.send(apply_for(coord)).unwrap();
        tx.send(apply_for(coord)).unwrap();
        scheduler.drain(&mut views, &mut backend);

        assert_eq!(backend.uploads, 2);
        assert_eq!(backend.drops, 1);
        assert_eq!(backend.live_meshes, 1);
    }

    #[test]
    fn colliders_attach_only_after_a_mesh_is_applied() {
        let mut scheduler = ApplyScheduler::new(2, 1);
        let mut views = FxHashMap::default();
        let mut backend = HeadlessBackend::default();

        let coord = ChunkCoord::new(0, 0);
        let mut v = view();
        v.requires_collider = true;
        views.insert(coord, v);

        // queued before any mesh exists: skipped, no budget consumed
        scheduler.queue_collider(coord);
        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.colliders_attached, 0);

        scheduler.mesh_sender().send(apply_for(coord)).unwrap();
        let report = scheduler.drain(&mut views, &mut backend);
        assert_eq!(report.applied, vec![coord]);
        // the apply re-queued the collider and the same drain attached it
        assert_eq!(report.colliders_attached, 1);
        assert!(views[&coord].collider.is_some());
        assert_eq!(backend.live_colliders, 1);
    }

    #[test]
    fn ready_notifications_follow_applies() {
        let mut scheduler = ApplyScheduler::new(4, 1);
        let ready = scheduler.subscribe_mesh_ready().unwrap();
        let mut views = FxHashMap::default();
        let mut backend = HeadlessBackend::default();

        let coord = ChunkCoord::new(1, 2);
        views.insert(coord, view());
        scheduler.mesh_sender().send(apply_for(coord)).unwrap();
        scheduler.drain(&mut views, &mut backend);

        assert_eq!(ready.try_recv(), Ok(coord));
        assert!(ready.try_recv().is_err());
    }
}
