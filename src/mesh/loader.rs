//! Background meshing on a worker pool.
//!
//! Workers take a read lock on the shared chunk store for the duration of
//! one mesh build. A request whose chunk disappeared before a worker got
//! to it is silently dropped; the streaming layer clears its in-flight
//! mark when the apply queue is drained, never here.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{Sender, bounded};
use parking_lot::RwLock;
use tracing::trace;

use crate::core::chunk::ChunkCoord;
use crate::mesh::mesher::generate_mesh;
use crate::scheduler::MeshApply;
use crate::world::store::ChunkStore;

const MESH_QUEUE_CAPACITY: usize = 128;

pub struct MeshLoader {
    request_tx: Sender<ChunkCoord>,
    worker_count: usize,
}

impl MeshLoader {
    pub fn new(
        store: Arc<RwLock<ChunkStore>>,
        results: Sender<MeshApply>,
        worker_count: usize,
    ) -> Self {
        let (request_tx, request_rx) = bounded::<ChunkCoord>(MESH_QUEUE_CAPACITY);

        for worker_id in 0..worker_count {
            let rx = request_rx.clone();
            let tx = results.clone();
            let store = Arc::clone(&store);

            thread::Builder::new()
                .name(format!("mesh-worker-{}", worker_id))
                .spawn(move || {
                    while let Ok(coord) = rx.recv() {
                        let buffer = {
                            let store = store.read();
                            generate_mesh(&store, coord)
                        };
                        match buffer {
                            Some(buffer) => {
                                if tx.send(MeshApply { coord, buffer }).is_err() {
                                    break;
                                }
                            }
                            // chunk was destroyed before we got to it
                            None => trace!(%coord, "skipping mesh for missing chunk"),
                        }
                    }
                })
                .expect("failed to spawn mesh worker");
        }

        MeshLoader {
            request_tx,
            worker_count,
        }
    }

    /// Queue a chunk for meshing. Returns false when the queue is full;
    /// the caller should retry on a later tick.
    pub fn request(&self, coord: ChunkCoord) -> bool {
        self.request_tx.try_send(coord).is_ok()
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::block::BlockType;
    use crate::core::chunk::ChunkData;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn workers_mesh_resident_chunks() {
        let coord = ChunkCoord::new(0, 0);
        let mut data = ChunkData::new();
        data.set(4, 4, 4, BlockType::Stone);

        let store = Arc::new(RwLock::new(ChunkStore::new()));
        store.write().insert(coord, data).unwrap();

        let (tx, rx) = unbounded();
        let loader = MeshLoader::new(Arc::clone(&store), tx, 1);
        assert!(loader.request(coord));

        let apply = rx
            .recv_timeout(Duration::from_secs(30))
            .expect("mesh result");
        assert_eq!(apply.coord, coord);
        assert_eq!(apply.buffer.face_count(), 6);
    }

    #[test]
    fn missing_chunks_produce_no_result() {
        let store = Arc::new(RwLock::new(ChunkStore::new()));
        let (tx, rx) = unbounded();
        let loader = MeshLoader::new(store, tx, 1);

        assert!(loader.request(ChunkCoord::new(9, 9)));
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }
}
