//! 3D cave carving via thresholded noise and cellular-automaton refinement
//! (§4.G, cave half).

use talus_core::NoiseGenerator;
use talus_storage::{Chunk, VoxelKind};

const CAVE_SCALE: f32 = 0.05;
const CAVE_THRESHOLD: f32 = 0.4;

#[inline]
fn index(x: i32, y: i32, z: i32, size: i32) -> usize {
    (y * size * size + z * size + x) as usize
}

/// Builds the initial boolean cave map: `true` where the normalized 3D
/// noise field exceeds [`CAVE_THRESHOLD`].
fn initial_cave_map(noise: &NoiseGenerator, pos_x: i32, pos_y: i32, pos_z: i32, size: i32, height: i32) -> Vec<bool> {
    let mut map = vec![false; (size * size * height) as usize];
    let world_x = pos_x * size;
    let world_y = pos_y * height;
    let world_z = pos_z * size;

    for y in 0..height {
        for z in 0..size {
            for x in 0..size {
                let wx = (world_x + x) as f32;
                let wy = (world_y + y) as f32;
                let wz = (world_z + z) as f32;
                let n = noise.perlin_3d(wx, wy, wz, CAVE_SCALE, 1, 0.5, 2.0);
                let normalized = (n + 1.0) * 0.5;
                map[index(x, y, z, size)] = normalized > CAVE_THRESHOLD;
            }
        }
    }
    map
}

/// Refines `map` in place for `iterations` passes of 26-neighbor cellular
/// automata. Border cells are never updated (neighbor lookups only touch
/// interior cells, matching the chunk-boundary-is-a-wall rule elsewhere in
/// the pipeline).
fn apply_cellular_automata(map: Vec<bool>, size: i32, height: i32, iterations: u32) -> Vec<bool> {
    let mut map = map;
    for _ in 0..iterations {
        let mut next = map.clone();
        for y in 1..height - 1 {
            for z in 1..size - 1 {
                for x in 1..size - 1 {
                    let mut cave_neighbors = 0;
                    for dy in -1..=1 {
                        for dz in -1..=1 {
                            for dx in -1..=1 {
                                if dx == 0 && dy == 0 && dz == 0 {
                                    continue;
                                }
                                if map[index(x + dx, y + dy, z + dz, size)] {
                                    cave_neighbors += 1;
                                }
                            }
                        }
                    }

                    let idx = index(x, y, z, size);
                    next[idx] = if map[idx] {
                        (5..=18).contains(&cave_neighbors)
                    } else {
                        cave_neighbors >= 12
                    };
                }
            }
        }
        map = next;
    }
    map
}

/// Applies the refined cave map: where marked a cave, Stone/Dirt become Air;
/// everything else (water, etc.) is preserved.
fn apply_cave_map(chunk: &Chunk, map: &[bool], size: i32, height: i32) {
    for y in 1..height - 1 {
        for z in 0..size {
            for x in 0..size {
                if !map[index(x, y, z, size)] {
                    continue;
                }
                let current = chunk.get_voxel(x, y, z);
                if current == VoxelKind::Stone || current == VoxelKind::Dirt {
                    chunk.set_voxel(x, y, z, VoxelKind::Air);
                }
            }
        }
    }
}

/// Carves caves into an already-terrain-filled chunk.
pub fn generate_caves(chunk: &Chunk, noise: &NoiseGenerator, cave_iterations: u32) {
    let pos = chunk.position();
    let size = i32::from(chunk.size());
    let height = i32::from(chunk.height());

    let map = initial_cave_map(noise, pos.cx, pos.cy, pos.cz, size, height);
    let map = apply_cellular_automata(map, size, height, cave_iterations);
    apply_cave_map(chunk, &map, size, height);
}
