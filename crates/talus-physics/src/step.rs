//! The per-tick cellular physics step (§4.J).

use std::sync::Arc;

use talus_pool::ThreadPool;
use talus_storage::{Chunk, VoxelKind};

/// Reads a cell, treating anything outside the chunk's bounds as `Air` —
/// cross-chunk physics is an accepted first-implementation gap (§9).
fn read(chunk: &Chunk, x: i32, y: i32, z: i32) -> VoxelKind {
    chunk.get_voxel(x, y, z)
}

/// Writes a cell; a write outside bounds is silently dropped by
/// [`Chunk::set_voxel`] itself, matching the "treated as a wall" rule.
fn write(chunk: &Chunk, x: i32, y: i32, z: i32, kind: VoxelKind) {
    chunk.set_voxel(x, y, z, kind);
}

fn simulate_gravity(chunk: &Chunk, x: i32, y: i32, z: i32) -> bool {
    let below = read(chunk, x, y - 1, z);

    if below == VoxelKind::Air {
        let current = chunk.get_voxel(x, y, z);
        write(chunk, x, y - 1, z, current);
        write(chunk, x, y, z, VoxelKind::Air);
        return true;
    }

    if below.is_fluid() {
        for dx in [-1, 1] {
            if read(chunk, x + dx, y - 1, z) == VoxelKind::Air {
                write(chunk, x + dx, y - 1, z, below);
                let current = chunk.get_voxel(x, y, z);
                write(chunk, x, y - 1, z, current);
                write(chunk, x, y, z, VoxelKind::Air);
                return true;
            }
        }
        for dz in [-1, 1] {
            if read(chunk, x, y - 1, z + dz) == VoxelKind::Air {
                write(chunk, x, y - 1, z + dz, below);
                let current = chunk.get_voxel(x, y, z);
                write(chunk, x, y - 1, z, current);
                write(chunk, x, y, z, VoxelKind::Air);
                return true;
            }
        }
    }

    false
}

fn simulate_fluid(chunk: &Chunk, x: i32, y: i32, z: i32) -> bool {
    let fluid = chunk.get_voxel(x, y, z);

    if read(chunk, x, y - 1, z) == VoxelKind::Air {
        write(chunk, x, y - 1, z, fluid);
        write(chunk, x, y, z, VoxelKind::Air);
        return true;
    }

    let mut flowed = false;
    for dx in [-1, 1] {
        if read(chunk, x + dx, y, z) == VoxelKind::Air
            && read(chunk, x + dx, y - 1, z) == VoxelKind::Air
        {
            write(chunk, x + dx, y - 1, z, fluid);
            flowed = true;
        }
    }
    for dz in [-1, 1] {
        if read(chunk, x, y, z + dz) == VoxelKind::Air
            && read(chunk, x, y - 1, z + dz) == VoxelKind::Air
        {
            write(chunk, x, y - 1, z + dz, fluid);
            flowed = true;
        }
    }

    if flowed {
        write(chunk, x, y, z, VoxelKind::Air);
    }
    flowed
}

/// Runs the bottom-up gravity/fluid scan over a single chunk, returning the
/// number of cells that moved.
#[must_use]
pub fn step_chunk(chunk: &Chunk) -> usize {
    if !chunk.is_generated() {
        return 0;
    }

    let size = i32::from(chunk.size());
    let height = i32::from(chunk.height());
    let mut updates = 0usize;

    for y in 1..height {
        for z in 0..size {
            for x in 0..size {
                let kind = chunk.get_voxel(x, y, z);
                if kind == VoxelKind::Air {
                    continue;
                }

                let moved = if kind.is_granular() {
                    simulate_gravity(chunk, x, y, z)
                } else if kind.is_fluid() {
                    simulate_fluid(chunk, x, y, z)
                } else {
                    false
                };

                if moved {
                    updates += 1;
                }
            }
        }
    }

    if updates > 0 {
        chunk.set_dirty(true);
    }
    updates
}

/// Submits one task per chunk to `pool`, blocks until every task has
/// joined, and returns the total number of cells that moved.
#[must_use]
pub fn step(chunks: &[Arc<Chunk>], pool: &ThreadPool) -> usize {
    if chunks.is_empty() {
        return 0;
    }

    let handles: Vec<_> = chunks
        .iter()
        .map(|chunk| {
            let chunk = Arc::clone(chunk);
            pool.submit(move || step_chunk(&chunk))
        })
        .collect();

    handles.into_iter().filter_map(|h| h.join()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use talus_core::ChunkPos;

    fn chunk(size: u16, height: u16) -> Chunk {
        let c = Chunk::new(ChunkPos::new(0, 0, 0), size, height);
        c.set_generated(true);
        c
    }

    #[test]
    fn ungenerated_chunk_is_skipped() {
        let c = Chunk::new(ChunkPos::new(0, 0, 0), 4, 4);
        c.set_voxel(0, 1, 0, VoxelKind::Sand);
        assert_eq!(step_chunk(&c), 0);
    }

    #[test]
    fn sand_falls_one_cell_per_tick() {
        let c = chunk(4, 8);
        c.set_voxel(1, 3, 1, VoxelKind::Sand);
        let updates = step_chunk(&c);
        assert_eq!(updates, 1);
        assert_eq!(c.get_voxel(1, 2, 1), VoxelKind::Sand);
        assert_eq!(c.get_voxel(1, 3, 1), VoxelKind::Air);
    }

    #[test]
    fn sand_settles_on_stone() {
        let c = chunk(4, 8);
        c.set_voxel(1, 0, 1, VoxelKind::Stone);
        c.set_voxel(1, 1, 1, VoxelKind::Sand);
        let updates = step_chunk(&c);
        assert_eq!(updates, 0);
        assert_eq!(c.get_voxel(1, 1, 1), VoxelKind::Sand);
    }

    #[test]
    fn sand_displaces_water_sideways() {
        let c = chunk(4, 8);
        // water directly below the sand; no Air below the water either
        // except one adjacent cell at the water's layer.
        c.set_voxel(1, 0, 1, VoxelKind::Water);
        c.set_voxel(1, 1, 1, VoxelKind::Sand);
        // block the straight-down path at y-1 everywhere except x+1.
        c.set_voxel(0, 0, 1, VoxelKind::Stone);
        c.set_voxel(1, 0, 0, VoxelKind::Stone);
        c.set_voxel(1, 0, 2, VoxelKind::Stone);

        let updates = step_chunk(&c);
        assert_eq!(updates, 1);
        assert_eq!(c.get_voxel(1, 0, 1), VoxelKind::Sand);
        assert_eq!(c.get_voxel(2, 0, 1), VoxelKind::Water);
    }

    #[test]
    fn water_flows_down_then_spreads() {
        let c = chunk(5, 8);
        c.set_voxel(2, 2, 2, VoxelKind::Water);
        step_chunk(&c); // flows straight down to y=1
        assert_eq!(c.get_voxel(2, 1, 2), VoxelKind::Water);

        // block straight-down flow, force horizontal spread
        c.set_voxel(2, 0, 2, VoxelKind::Stone);
        let updates = step_chunk(&c);
        assert!(updates >= 1);
        assert_eq!(c.get_voxel(2, 1, 2), VoxelKind::Air);
    }

    #[test]
    fn bottom_up_order_lets_a_column_fall_multiple_cells_across_ticks() {
        let c = chunk(4, 10);
        c.set_voxel(1, 6, 1, VoxelKind::Sand);
        for _ in 0..6 {
            step_chunk(&c);
        }
        assert_eq!(c.get_voxel(1, 0, 1), VoxelKind::Sand);
    }

    #[test]
    fn step_across_chunks_sums_updates() {
        let a = Arc::new(chunk(4, 8));
        a.set_voxel(1, 3, 1, VoxelKind::Sand);
        let b = Arc::new(chunk(4, 8));
        b.set_voxel(2, 2, 2, VoxelKind::Water);

        let pool = ThreadPool::new(2);
        let total = step(&[a, b], &pool);
        assert_eq!(total, 2);
    }

    #[test]
    fn empty_chunk_list_is_a_noop() {
        let pool = ThreadPool::new(1);
        assert_eq!(step(&[], &pool), 0);
    }
}
