//! Render backend seam.
//!
//! The engine never talks to a GPU or physics engine directly; mesh and
//! collider lifecycle events go through this trait so the streaming layer
//! can run headless in tests and benchmarks.

use crate::core::chunk::ChunkCoord;
use crate::mesh::buffer::MeshBuffer;

/// Opaque handle to an uploaded mesh, minted by the backend.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct MeshHandle(pub u64);

pub trait RenderBackend: Send {
    /// Upload chunk geometry, returning a handle the engine stores in the
    /// chunk's view. Re-uploads for the same coordinate get a fresh handle;
    /// the old one is dropped separately.
    fn upload_mesh(&mut self, coord: ChunkCoord, buffer: &MeshBuffer) -> MeshHandle;

    fn drop_mesh(&mut self, coord: ChunkCoord, handle: MeshHandle);

    /// Build collision geometry from an already uploaded mesh.
    fn attach_collider(&mut self, coord: ChunkCoord, handle: MeshHandle);

    fn detach_collider(&mut self, coord: ChunkCoord);
}

/// Backend that only counts. Used by the headless binary and the tests.
#[derive(Default)]
pub struct HeadlessBackend {
    next_handle: u64,
    pub live_meshes: usize,
    pub live_colliders: usize,
    pub uploads: usize,
    pub drops: usize,
}

impl RenderBackend for HeadlessBackend {
    fn upload_mesh(&mut self, _coord: ChunkCoord, _buffer: &MeshBuffer) -> MeshHandle {
        self.next_handle += 1;
        self.uploads += 1;
        self.live_meshes += 1;
        MeshHandle(self.next_handle)
    }

    fn drop_mesh(&mut self, _coord: ChunkCoord, _handle: MeshHandle) {
        self.drops += 1;
        self.live_meshes = self.live_meshes.saturating_sub(1);
    }

    fn attach_collider(&mut self, _coord: ChunkCoord, _handle: MeshHandle) {
        self.live_colliders += 1;
    }

    fn detach_collider(&mut self, _coord: ChunkCoord) {
        self.live_colliders = self.live_colliders.saturating_sub(1);
    }
}
