//! Background chunk generation on a worker pool.
//!
//! Workers never touch shared state: each owns a full `ChunkGenerator`
//! built from the same seed, and generation purity guarantees identical
//! output regardless of which worker picks a request up. Results come
//! back over a bounded channel and are drained on the tick thread.

use std::thread;

use crossbeam_channel::{Receiver, Sender, TryRecvError, bounded};
use rustc_hash::FxHashSet;
use tracing::debug;

use crate::core::chunk::{ChunkCoord, ChunkData};
use crate::world::generator::ChunkGenerator;

const REQUEST_QUEUE_CAPACITY: usize = 256;
const RESULT_QUEUE_CAPACITY: usize = 64;

/// Completed generation, ready to be inserted into the store.
pub struct GenResult {
    pub coord: ChunkCoord,
    pub data: ChunkData,
}

/// Owns the generation worker pool and tracks which coordinates are
/// already in flight so the streaming layer never requests duplicates.
pub struct ChunkLoader {
    request_tx: Sender<ChunkCoord>,
    result_rx: Receiver<GenResult>,
    pending: FxHashSet<ChunkCoord>,
    worker_count: usize,
}

impl ChunkLoader {
    pub fn new(seed: u32, worker_count: usize) -> Self {
        let (request_tx, request_rx) = bounded::<ChunkCoord>(REQUEST_QUEUE_CAPACITY);
        let (result_tx, result_rx) = bounded::<GenResult>(RESULT_QUEUE_CAPACITY);

        for worker_id in 0..worker_count {
            let rx = request_rx.clone();
            let tx = result_tx.clone();
            let generator = ChunkGenerator::new(seed);

            thread::Builder::new()
                .name(format!("chunk-gen-{}", worker_id))
                .spawn(move || {
                    while let Ok(coord) = rx.recv() {
                        let data = generator.generate(coord);
                        if tx.send(GenResult { coord, data }).is_err() {
                            // main thread has closed
                            break;
                        }
                    }
                })
                .expect("failed to spawn chunk generation worker");
        }

        ChunkLoader {
            request_tx,
            result_rx,
            pending: FxHashSet::default(),
            worker_count,
        }
    }

    /// Enqueue a batch of coordinates, nearest first. Requests already in
    /// flight are skipped, and a full queue drops the remainder; they get
    /// re-requested on a later tick.
    pub fn request_batch(&mut self, requests: &[(ChunkCoord, i32)]) {
        let mut sorted: Vec<&(ChunkCoord, i32)> = requests
            .iter()
            .filter(|(coord, _)| !self.pending.contains(coord))
            .collect();
        sorted.sort_by_key(|(_, priority)| *priority);

        for &&(coord, _) in &sorted {
            if self.pending.len() >= REQUEST_QUEUE_CAPACITY {
                debug!(pending = self.pending.len(), "generation queue saturated");
                break;
            }
            if self.request_tx.try_send(coord).is_ok() {
                self.pending.insert(coord);
            }
        }
    }

    pub fn is_pending(&self, coord: ChunkCoord) -> bool {
        self.pending.contains(&coord)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drain up to `max_results` completed chunks without blocking.
    pub fn poll(&mut self, max_results: usize) -> Vec<GenResult> {
        let mut results = Vec::with_capacity(max_results);
        for _ in 0..max_results {
            match self.result_rx.try_recv() {
                Ok(result) => {
                    self.pending.remove(&result.coord);
                    results.push(result);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        results
    }

    pub fn worker_count(&self) -> usize {
        self.worker_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    fn poll_until(loader: &mut ChunkLoader, want: usize) -> Vec<GenResult> {
        let deadline = Instant::now() + Duration::from_secs(30);
        let mut results = Vec::new();
        while results.len() < want && Instant::now() < deadline {
            results.extend(loader.poll(want - results.len()));
            thread::sleep(Duration::from_millis(1));
        }
        results
    }

    #[test]
    fn workers_deliver_requested_chunks() {
        let mut loader = ChunkLoader::new(12345, 2);
        let coords = [
            ChunkCoord::new(0, 0),
            ChunkCoord::new(1, 0),
            ChunkCoord::new(0, 1),
        ];
        let requests: Vec<_> = coords.iter().map(|&c| (c, c.dist_sq(ChunkCoord::new(0, 0)))).collect();
        loader.request_batch(&requests);
        assert_eq!(loader.pending_count(), 3);

        let results = poll_until(&mut loader, 3);
        assert_eq!(results.len(), 3);
        assert_eq!(loader.pending_count(), 0);

        let mut got: Vec<ChunkCoord> = results.iter().map(|r| r.coord).collect();
        got.sort_by_key(|c| (c.x, c.z));
        let mut want = coords.to_vec();
        want.sort_by_key(|c| (c.x, c.z));
        assert_eq!(got, want);
    }

    #[test]
    fn duplicate_requests_are_dropped() {
        let mut loader = ChunkLoader::new(1, 1);
        let coord = ChunkCoord::new(5, 5);
        loader.request_batch(&[(coord, 0)]);
        loader.request_batch(&[(coord, 0)]);
        assert_eq!(loader.pending_count(), 1);
        assert!(loader.is_pending(coord));

        let results = poll_until(&mut loader, 2);
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn worker_output_matches_direct_generation() {
        let mut loader = ChunkLoader::new(4242, 1);
        let coord = ChunkCoord::new(-2, 3);
        loader.request_batch(&[(coord, 0)]);
        let results = poll_until(&mut loader, 1);
        assert_eq!(results.len(), 1);

        let direct = ChunkGenerator::new(4242).generate(coord);
        let from_worker = &results[0].data;
        for x in 0..crate::constants::CHUNK_SIZE {
            for y in 0..crate::constants::CHUNK_HEIGHT {
                for z in 0..crate::constants::CHUNK_SIZE {
                    assert_eq!(from_worker.get(x, y, z), direct.get(x, y, z));
                }
            }
        }
    }
}
