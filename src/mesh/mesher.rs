//! Face-culling chunk mesher.
//!
//! Emits one quad per solid-block face that touches a non-solid cell,
//! resolving neighbor cells through the store's adjacency links so chunk
//! boundaries stay closed. Two extra suppression rules keep geometry
//! honest at world limits: the floor never grows a bottom face and the
//! ceiling never grows a top face. Side faces of non-decoration blocks
//! below the column's ground level are culled too, since nothing can
//! ever see them.

use crate::constants::*;
use crate::core::block::BlockType;
use crate::core::chunk::ChunkCoord;
use crate::mesh::buffer::MeshBuffer;
use crate::world::store::ChunkStore;

// Face order: north (+z), south (-z), west (-x), east (+x), up, down.
const FACE_OFFSETS: [[i32; 3]; 6] = [
    [0, 0, 1],
    [0, 0, -1],
    [-1, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
];

const FACE_NORMALS: [[f32; 3]; 6] = [
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
    [-1.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
];

// Corner order matches the quad winding in MeshBuffer::push_quad; each
// face reads counter-clockwise when viewed from outside the block.
const FACE_CORNERS: [[[f32; 3]; 4]; 6] = [
    // north
    [[0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [1.0, 1.0, 1.0], [0.0, 1.0, 1.0]],
    // south
    [[1.0, 0.0, 0.0], [0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 1.0, 0.0]],
    // west
    [[0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 1.0], [0.0, 1.0, 0.0]],
    // east
    [[1.0, 0.0, 1.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]],
    // up
    [[0.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    // down
    [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 0.0, 1.0], [0.0, 0.0, 1.0]],
];

const FACE_UP: usize = 4;
const FACE_DOWN: usize = 5;

/// Mesh the chunk at `coord` in chunk-local coordinates. Returns `None`
/// when the chunk is not resident.
pub fn generate_mesh(store: &ChunkStore, coord: ChunkCoord) -> Option<MeshBuffer> {
    let data = store.data(coord)?;
    let mut buffer = MeshBuffer::with_capacity(256);

    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let ground = store.ground_level_at(coord, x, z);

            for y in 0..CHUNK_HEIGHT {
                let block = data.get(x, y, z);
                if !block.is_solid() {
                    continue;
                }

                for face in 0..6 {
                    if face == FACE_DOWN && y == 0 {
                        continue;
                    }
                    if face == FACE_UP && y == CHUNK_HEIGHT - 1 {
                        continue;
                    }
                    if face < FACE_UP && !block.is_decoration() && y < ground {
                        continue;
                    }

                    let [dx, dy, dz] = FACE_OFFSETS[face];
                    let neighbor = store.block_at(coord, x + dx, y + dy, z + dz);
                    if neighbor.is_some_and(|b| b.is_solid()) {
                        continue;
                    }

                    push_face(&mut buffer, block, face, x, y, z);
                }
            }
        }
    }

    Some(buffer)
}

fn push_face(buffer: &mut MeshBuffer, block: BlockType, face: usize, x: i32, y: i32, z: i32) {
    let mut corners = FACE_CORNERS[face];
    for corner in &mut corners {
        corner[0] += x as f32;
        corner[1] += y as f32;
        corner[2] += z as f32;
    }

    let tile = match face {
        FACE_UP => block.tile_top(),
        FACE_DOWN => block.tile_bottom(),
        _ => block.tile_side(),
    };

    buffer.push_quad(corners, FACE_NORMALS[face], tile_uvs(tile));
}

// Atlas tile to padded UV rect; padding keeps sampling off tile seams.
fn tile_uvs(tile: (u32, u32)) -> [[f32; 2]; 4] {
    let step = 1.0 / ATLAS_GRID as f32;
    let u0 = tile.0 as f32 * step + UV_PADDING;
    let u1 = (tile.0 + 1) as f32 * step - UV_PADDING;
    let v0 = tile.1 as f32 * step + UV_PADDING;
    let v1 = (tile.1 + 1) as f32 * step - UV_PADDING;
    [[u0, v0], [u1, v0], [u1, v1], [u0, v1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::chunk::ChunkData;

    fn store_with(coord: ChunkCoord, data: ChunkData) -> ChunkStore {
        let mut store = ChunkStore::new();
        store.insert(coord, data).unwrap();
        store
    }

    #[test]
    fn lone_block_emits_six_faces() {
        let coord = ChunkCoord::new(0, 0);
        let mut data = ChunkData::new();
        data.set(8, 5, 8, BlockType::Stone);
        let store = store_with(coord, data);

        let mesh = generate_mesh(&store, coord).unwrap();
        assert_eq!(mesh.face_count(), 6);
        assert_eq!(mesh.positions.len(), 24);
        assert_eq!(mesh.triangle_count(), 12);
    }

    #[test]
    fn floor_block_has_no_bottom_face() {
        let coord = ChunkCoord::new(0, 0);
        let mut data = ChunkData::new();
        data.set(8, 0, 8, BlockType::Stone);
        let store = store_with(coord, data);

        let mesh = generate_mesh(&store, coord).unwrap();
        assert_eq!(mesh.face_count(), 5);
    }

    #[test]
    fn fully_buried_interior_emits_no_faces() {
        // A solid chunk linked on all four sides meshes completely closed:
        // sides face solid neighbors, the floor and ceiling rules cover the
        // vertical extremes.
        let center = ChunkCoord::new(0, 0);
        let mut store = ChunkStore::new();
        for cx in -1..=1 {
            for cz in -1..=1 {
                let mut data = ChunkData::new();
                data.fill_with(|_, _, _| BlockType::Stone);
                store.insert(ChunkCoord::new(cx, cz), data).unwrap();
            }
        }
        for cx in -1..=1 {
            for cz in -1..=1 {
                store.link_neighbors(ChunkCoord::new(cx, cz));
            }
        }

        let mesh = generate_mesh(&store, center).unwrap();
        assert!(mesh.is_empty(), "expected closed mesh, got {} faces", mesh.face_count());
    }

    #[test]
    fn underground_sides_are_culled_at_missing_borders() {
        // Unlinked chunk: neighbor lookups past the border report air, but
        // side faces below ground level stay culled anyway.
        let coord = ChunkCoord::new(0, 0);
        let mut data = ChunkData::new();
        data.fill_with(|_, y, _| if y <= 10 { BlockType::Stone } else { BlockType::Air });
        let store = store_with(coord, data);

        let mesh = generate_mesh(&store, coord).unwrap();
        // one surface cap per column plus border side faces at ground level
        // only (4 edges of 16 columns); everything below stays closed
        let caps = (CHUNK_SIZE * CHUNK_SIZE) as usize;
        let border_sides = (4 * CHUNK_SIZE) as usize;
        assert_eq!(mesh.face_count(), caps + border_sides);
        for (i, normal) in mesh.normals.iter().step_by(4).enumerate() {
            if normal[1] == 0.0 {
                let y = mesh.positions[i * 4][1];
                assert_eq!(y, 10.0, "side face below ground level");
            }
        }
    }

    #[test]
    fn decoration_blocks_keep_their_sides() {
        // A wood block buried below its column's ground level is exempt
        // from underground side culling. Carve air pockets around it so
        // the faces are actually exposed.
        let coord = ChunkCoord::new(0, 0);
        let mut data = ChunkData::new();
        data.fill_with(|_, y, _| if y <= 10 { BlockType::Stone } else { BlockType::Air });
        data.set(8, 3, 8, BlockType::Wood);
        data.set(7, 3, 8, BlockType::Air);
        data.set(9, 3, 8, BlockType::Air);
        data.set(8, 3, 7, BlockType::Air);
        data.set(8, 3, 9, BlockType::Air);
        let store = store_with(coord, data);

        let mesh = generate_mesh(&store, coord).unwrap();
        // below-ground side faces belong to the wood block alone; the
        // surrounding stone stays culled
        let buried_sides = mesh
            .normals
            .iter()
            .step_by(4)
            .enumerate()
            .filter(|(i, n)| n[1] == 0.0 && mesh.positions[i * 4][1] < 10.0)
            .count();
        assert_eq!(buried_sides, 4);
    }

    #[test]
    fn missing_chunk_yields_none() {
        let store = ChunkStore::new();
        assert!(generate_mesh(&store, ChunkCoord::new(3, 3)).is_none());
    }
}
