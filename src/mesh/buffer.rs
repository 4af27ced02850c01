//! CPU-side mesh geometry, one buffer per chunk.

use bytemuck::{Pod, Zeroable};

/// Interleaved vertex layout for upload to a render backend.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Parallel vertex streams plus a triangle index list. Quads are pushed
/// four vertices at a time; indices always follow the (0, 1, 2), (0, 2, 3)
/// winding so every face renders with a consistent orientation.
#[derive(Default)]
pub struct MeshBuffer {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    pub fn with_capacity(faces: usize) -> Self {
        MeshBuffer {
            positions: Vec::with_capacity(faces * 4),
            normals: Vec::with_capacity(faces * 4),
            uvs: Vec::with_capacity(faces * 4),
            indices: Vec::with_capacity(faces * 6),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append one quad. `corners` are in winding order; `uvs` must match
    /// the corner order.
    pub fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.positions.len() as u32;

        self.positions.extend_from_slice(&corners);
        self.normals.extend_from_slice(&[normal; 4]);
        self.uvs.extend_from_slice(&uvs);

        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);
    }

    /// Interleave the streams for a GPU vertex buffer.
    pub fn interleave(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .zip(&self.uvs)
            .map(|((&position, &normal), &uv)| Vertex {
                position,
                normal,
                uv,
            })
            .collect()
    }
}
