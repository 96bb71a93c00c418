//! Resident chunk map, spiral load pattern, async generation/load pipeline,
//! and eviction (§4.D).

use std::collections::VecDeque;
use std::sync::Arc;

use glam::Vec3;
use hashbrown::HashMap;
use parking_lot::Mutex;
use talus_core::{ChunkPos, Config, WorldPos};
use talus_pool::{PollResult, TaskHandle, ThreadPool};
use talus_storage::{fileio, Chunk};

use crate::generation::{generate_chunk, NoiseSet};

/// Chunks further than `view_distance + 1` are evicted at most this many
/// per tick, so a single large viewer jump doesn't stall the caller with a
/// burst of synchronous saves.
const MAX_UNLOADS_PER_TICK: usize = 5;

/// The resident map, the in-flight generation/load futures, and the
/// eviction FIFO, all behind one lock — §5 calls these out as a single
/// guarded unit rather than three independently-locked collections.
struct ManagerState {
    resident: HashMap<ChunkPos, Arc<Chunk>>,
    pending: HashMap<ChunkPos, TaskHandle<Chunk>>,
    eviction_queue: VecDeque<ChunkPos>,
}

/// Owns the resident chunk map and drives streaming around a viewer
/// position. Holds only a [`Config`] (cloned, not a `World` reference),
/// resolving the cyclic-ownership note in §9.
pub struct ChunkManager {
    config: Config,
    noise: Arc<NoiseSet>,
    state: Mutex<ManagerState>,
}

pub(crate) fn chunk_file_path(save_directory: &str, pos: ChunkPos) -> std::path::PathBuf {
    std::path::Path::new(save_directory)
        .join("chunks")
        .join(format!("c.{}.{}.{}.dat", pos.cx, pos.cy, pos.cz))
}

/// Loads `pos` from disk if its file exists and deserializes cleanly,
/// otherwise runs the full generation pipeline. Mirrors `ChunkManager`'s
/// load-or-generate task body; corrupt files fall back to generation
/// rather than propagating the error (`CorruptChunkFile`, §7).
fn load_or_generate(pos: ChunkPos, config: &Config, noise: &NoiseSet) -> Chunk {
    let path = chunk_file_path(&config.save_directory, pos);
    if fileio::file_exists(&path) {
        let raw = fileio::load_from_file(&path);
        if !raw.is_empty() {
            match Chunk::deserialize(&raw) {
                Ok(chunk) => return chunk,
                Err(err) => {
                    tracing::warn!(?pos, %err, "corrupt chunk file, regenerating");
                }
            }
        }
    }

    let chunk = Chunk::new(pos, config.chunk_size, config.world_height);
    generate_chunk(&chunk, noise, config);
    chunk
}

/// Builds the ordered list of chunk-space `(dx, dz)` offsets the spiral
/// load pattern visits, innermost first: `(0, 0)`, then each ring
/// `L = 1..=view_distance` walked top row left→right, right column
/// top→bottom, bottom row right→left, left column bottom→top, corners
/// visited exactly once (§4.D). Y offset is always 0 — streaming is
/// horizontal only.
#[must_use]
pub fn spiral_offsets(view_distance: i32) -> Vec<(i32, i32)> {
    let mut offsets = vec![(0, 0)];
    for l in 1..=view_distance {
        for dx in -l..=l {
            offsets.push((dx, -l));
        }
        for dz in (-l + 1)..=l {
            offsets.push((l, dz));
        }
        for dx in (-l..l).rev() {
            offsets.push((dx, l));
        }
        for dz in (-l + 1..l).rev() {
            offsets.push((-l, dz));
        }
    }
    offsets
}

impl ChunkManager {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let noise = Arc::new(NoiseSet::new(config.seed));
        Self {
            config,
            noise,
            state: Mutex::new(ManagerState {
                resident: HashMap::new(),
                pending: HashMap::new(),
                eviction_queue: VecDeque::new(),
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn chunk_extents(&self) -> (i32, i32) {
        (i32::from(self.config.chunk_size), i32::from(self.config.world_height))
    }

    /// Floor-divides a world position into its chunk coordinate.
    #[must_use]
    pub fn world_to_chunk_pos(&self, world: WorldPos) -> ChunkPos {
        let (size, height) = self.chunk_extents();
        world.chunk_pos(size, height)
    }

    /// Normalizes a world position into its chunk-local coordinate.
    #[must_use]
    pub fn world_to_local_pos(&self, world: WorldPos) -> talus_core::LocalPos {
        let (size, height) = self.chunk_extents();
        world.local_pos(size, height)
    }

    /// Recomposes a world position from a chunk coordinate and a local
    /// offset within it.
    #[must_use]
    pub fn chunk_to_world_pos(&self, chunk: ChunkPos, local: talus_core::LocalPos) -> WorldPos {
        let (size, height) = self.chunk_extents();
        WorldPos::from_chunk_local(chunk, local, size, height)
    }

    /// Resident lookup; `None` if absent.
    #[must_use]
    pub fn get_chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.state.lock().resident.get(&pos).cloned()
    }

    /// A snapshot of every resident chunk.
    #[must_use]
    pub fn get_active_chunks(&self) -> Vec<Arc<Chunk>> {
        self.state.lock().resident.values().cloned().collect()
    }

    /// Computes the viewer's chunk coordinate, enqueues generation/load
    /// tasks along the spiral pattern for any offset that is neither
    /// resident nor pending, and queues chunks that have drifted beyond
    /// `view_distance + 1` for eviction — saving and unloading up to
    /// [`MAX_UNLOADS_PER_TICK`] of them immediately.
    pub fn update(&self, viewer_world_pos: Vec3, pool: &ThreadPool) {
        let viewer = WorldPos::from_vec3_floor(viewer_world_pos);
        let center = self.world_to_chunk_pos(viewer);

        let offsets = spiral_offsets(self.config.view_distance);
        {
            let mut state = self.state.lock();
            for (dx, dz) in offsets {
                let pos = ChunkPos::new(center.cx + dx, center.cy, center.cz + dz);
                if state.resident.contains_key(&pos) || state.pending.contains_key(&pos) {
                    continue;
                }
                let config = self.config.clone();
                let noise = Arc::clone(&self.noise);
                let handle = pool.submit(move || load_or_generate(pos, &config, &noise));
                state.pending.insert(pos, handle);
            }

            let view_distance = self.config.view_distance;
            let to_evict: Vec<ChunkPos> = state
                .resident
                .keys()
                .copied()
                .filter(|pos| center.horizontal_distance(*pos) > view_distance + 1)
                .collect();
            for pos in to_evict {
                if !state.eviction_queue.contains(&pos) {
                    state.eviction_queue.push_back(pos);
                }
            }

            for _ in 0..MAX_UNLOADS_PER_TICK {
                let Some(pos) = state.eviction_queue.pop_front() else {
                    break;
                };
                self.unload_locked(&mut state, pos);
            }
        }
    }

    /// Saves `pos` first if dirty, then drops it from the resident map.
    /// Tasks already generating `pos` are not cancelled (§4.D); if one
    /// completes after this, it simply rejoins the resident map on the
    /// next [`ChunkManager::process_completed_chunks`] and may be evicted
    /// again next tick.
    fn unload_locked(&self, state: &mut ManagerState, pos: ChunkPos) {
        let Some(chunk) = state.resident.get(&pos).cloned() else {
            return;
        };
        if chunk.is_dirty() {
            self.persist(&chunk);
        }
        state.resident.remove(&pos);
    }

    fn persist(&self, chunk: &Chunk) -> bool {
        let path = chunk_file_path(&self.config.save_directory, chunk.position());
        let data = chunk.serialize();
        match fileio::save_to_file(&path, &data, self.config.use_compression) {
            Ok(()) => {
                chunk.set_dirty(false);
                true
            }
            Err(err) => {
                tracing::error!(pos = ?chunk.position(), %err, "failed to save chunk");
                false
            }
        }
    }

    /// Polls every pending future without blocking; ready ones move into
    /// the resident map, failed ones (task panicked) are dropped and
    /// logged. Returns the count transferred.
    pub fn process_completed_chunks(&self) -> usize {
        let mut state = self.state.lock();
        let pending_positions: Vec<ChunkPos> = state.pending.keys().copied().collect();
        let mut transferred = 0;

        for pos in pending_positions {
            let Some(handle) = state.pending.remove(&pos) else {
                continue;
            };
            match handle.try_poll() {
                PollResult::Ready(chunk) => {
                    state.resident.insert(pos, Arc::new(chunk));
                    transferred += 1;
                }
                PollResult::Pending(handle) => {
                    state.pending.insert(pos, handle);
                }
                PollResult::Failed => {
                    tracing::error!(?pos, "generation/load task failed");
                }
            }
        }

        transferred
    }

    /// Serializes and writes every dirty resident chunk, clearing `dirty`
    /// on success. Returns the count written.
    pub fn save_chunks(&self) -> usize {
        let state = self.state.lock();
        let mut written = 0;
        for chunk in state.resident.values() {
            if chunk.is_dirty() && self.persist(chunk) {
                written += 1;
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use talus_storage::VoxelKind;
    use tempfile::tempdir;

    fn test_config(dir: &std::path::Path) -> Config {
        Config {
            seed: 7,
            view_distance: 2,
            chunk_size: 8,
            world_height: 16,
            save_directory: dir.to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn spiral_offset_count_matches_formula() {
        // §8 property 9: exactly (2d+1)^2 - 1 *non-origin* offsets; the
        // spiral itself always leads with the origin in addition to those.
        for d in 0..6 {
            let offsets = spiral_offsets(d);
            let non_origin = offsets.len() - 1;
            let expected = ((2 * d + 1) * (2 * d + 1) - 1) as usize;
            assert_eq!(non_origin, expected, "view_distance={d}");
        }
    }

    #[test]
    fn spiral_offsets_have_no_duplicates_and_stay_in_radius() {
        for d in 1..5 {
            let offsets = spiral_offsets(d);
            let set: HashSet<(i32, i32)> = offsets.iter().copied().collect();
            assert_eq!(set.len(), offsets.len(), "no duplicate offsets");
            for &(dx, dz) in &offsets {
                assert!(dx.abs() <= d && dz.abs() <= d);
            }
        }
    }

    #[test]
    fn spiral_starts_at_origin() {
        assert_eq!(spiral_offsets(3)[0], (0, 0));
    }

    #[test]
    fn update_generates_chunks_and_processes_them() {
        let dir = tempdir().unwrap();
        let manager = ChunkManager::new(test_config(dir.path()));
        let pool = ThreadPool::new(2);

        manager.update(Vec3::ZERO, &pool);
        // drain every pending future
        let mut total = 0;
        for _ in 0..200 {
            total += manager.process_completed_chunks();
            if manager.state.lock().pending.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let expected = ((2 * 2 + 1) * (2 * 2 + 1)) as usize; // view_distance=2, plus origin
        assert_eq!(total, expected);
        assert_eq!(manager.get_active_chunks().len(), expected);
    }

    #[test]
    fn eviction_saves_dirty_chunks_then_reloads_equal() {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let manager = ChunkManager::new(config.clone());
        let pool = ThreadPool::new(1);

        manager.update(Vec3::ZERO, &pool);
        loop {
            manager.process_completed_chunks();
            if manager.state.lock().pending.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }

        let origin = ChunkPos::new(0, 0, 0);
        let chunk = manager.get_chunk(origin).expect("origin chunk resident");
        chunk.set_voxel(0, 0, 0, VoxelKind::Diamond);
        let before = chunk.serialize();

        {
            let mut state = manager.state.lock();
            manager.unload_locked(&mut state, origin);
        }
        assert!(manager.get_chunk(origin).is_none());

        let raw = fileio::load_from_file(&chunk_file_path(&config.save_directory, origin));
        let reloaded = Chunk::deserialize(&raw).expect("saved chunk reloads");
        assert_eq!(reloaded.serialize(), before);
    }

    #[test]
    fn process_completed_chunks_is_a_noop_with_nothing_pending() {
        let dir = tempdir().unwrap();
        let manager = ChunkManager::new(test_config(dir.path()));
        assert_eq!(manager.process_completed_chunks(), 0);
    }
}
