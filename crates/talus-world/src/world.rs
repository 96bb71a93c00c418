//! Thin aggregator tying [`ChunkManager`] to world-space voxel access and
//! save/load of world-level metadata (§4.E).

use std::sync::Arc;

use glam::Vec3;
use talus_core::{ChunkPos, Config, Error, Result, WorldPos};
use talus_pool::ThreadPool;
use talus_storage::{fileio, Chunk, VoxelKind};

use crate::chunk_manager::ChunkManager;

fn metadata_path(save_directory: &str) -> std::path::PathBuf {
    std::path::Path::new(save_directory).join("world.dat")
}

/// `World::save`/`World::load`'s wire format for `world.dat`: 4 bytes seed
/// (u32 LE) + 2 bytes chunk size (u16 LE) + 2 bytes world height (u16 LE),
/// wrapped by the same RLE/flag envelope chunk files use (§6).
fn encode_metadata(config: &Config) -> Vec<u8> {
    let mut out = Vec::with_capacity(8);
    out.extend_from_slice(&config.seed.to_le_bytes());
    out.extend_from_slice(&config.chunk_size.to_le_bytes());
    out.extend_from_slice(&config.world_height.to_le_bytes());
    out
}

fn decode_metadata(data: &[u8]) -> Result<(u32, u16, u16)> {
    if data.len() < 8 {
        return Err(Error::InvalidData(format!(
            "world metadata too small: {} bytes, need at least 8",
            data.len()
        )));
    }
    let seed = u32::from_le_bytes(data[0..4].try_into().unwrap());
    let chunk_size = u16::from_le_bytes(data[4..6].try_into().unwrap());
    let world_height = u16::from_le_bytes(data[6..8].try_into().unwrap());
    Ok((seed, chunk_size, world_height))
}

/// The top-level handle a renderer/input layer (out of scope per §1) holds:
/// world-coordinate voxel access plus streaming and persistence, all
/// forwarded to a single owned [`ChunkManager`].
pub struct World {
    config: Config,
    manager: ChunkManager,
    last_viewer_pos: Vec3,
}

impl World {
    #[must_use]
    pub fn new(config: Config) -> Self {
        let manager = ChunkManager::new(config.clone());
        Self {
            config,
            manager,
            last_viewer_pos: Vec3::ZERO,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Remembers the viewer position and forwards to
    /// [`ChunkManager::update`].
    pub fn update_chunks(&mut self, viewer_world_pos: Vec3, pool: &ThreadPool) {
        self.last_viewer_pos = viewer_world_pos;
        self.manager.update(viewer_world_pos, pool);
    }

    /// The viewer position passed to the most recent `update_chunks` call.
    #[must_use]
    pub fn last_viewer_pos(&self) -> Vec3 {
        self.last_viewer_pos
    }

    pub fn integrate_completed_chunks(&self) -> usize {
        self.manager.process_completed_chunks()
    }

    #[must_use]
    pub fn get_chunk(&self, pos: ChunkPos) -> Option<Arc<Chunk>> {
        self.manager.get_chunk(pos)
    }

    #[must_use]
    pub fn get_active_chunks(&self) -> Vec<Arc<Chunk>> {
        self.manager.get_active_chunks()
    }

    /// Returns `Air` for any position in an unloaded chunk (`MissingChunk`,
    /// §7) rather than erroring.
    #[must_use]
    pub fn get_voxel(&self, pos: WorldPos) -> VoxelKind {
        let chunk_pos = self.manager.world_to_chunk_pos(pos);
        let local = self.manager.world_to_local_pos(pos);
        self.manager
            .get_chunk(chunk_pos)
            .map_or(VoxelKind::Air, |chunk| {
                chunk.get_voxel(local.x, local.y, local.z)
            })
    }

    /// Fails (`false`) when the target chunk is not resident
    /// (`MissingChunk`, §7); never panics.
    pub fn set_voxel(&self, pos: WorldPos, kind: VoxelKind) -> bool {
        let chunk_pos = self.manager.world_to_chunk_pos(pos);
        let local = self.manager.world_to_local_pos(pos);
        match self.manager.get_chunk(chunk_pos) {
            Some(chunk) => {
                chunk.set_voxel(local.x, local.y, local.z, kind);
                true
            }
            None => false,
        }
    }

    /// Creates the save directory, writes every dirty resident chunk, and
    /// writes `world.dat`. Returns the number of chunks written.
    pub fn save(&self) -> Result<usize> {
        std::fs::create_dir_all(&self.config.save_directory)?;
        let written = self.manager.save_chunks();
        let meta = encode_metadata(&self.config);
        fileio::save_to_file(
            &metadata_path(&self.config.save_directory),
            &meta,
            self.config.use_compression,
        )?;
        Ok(written)
    }

    /// Reads `<world_name>/world.dat` back, updates a fresh [`Config`]
    /// accordingly (seed, chunk size, world height; everything else keeps
    /// its default), and reinstantiates the chunk manager around it.
    pub fn load(world_name: &str) -> Result<Self> {
        let data = fileio::load_from_file(&metadata_path(world_name));
        if data.is_empty() {
            return Err(Error::NotFound(format!(
                "no world metadata at {world_name}"
            )));
        }
        let (seed, chunk_size, world_height) = decode_metadata(&data)?;
        let config = Config {
            seed,
            chunk_size,
            world_height,
            save_directory: world_name.to_string(),
            ..Config::default()
        };
        Ok(Self::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config_at(dir: &std::path::Path) -> Config {
        Config {
            seed: 5,
            view_distance: 1,
            chunk_size: 8,
            world_height: 16,
            save_directory: dir.to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    fn drain(world: &World) {
        let expected = crate::chunk_manager::spiral_offsets(world.config.view_distance).len();
        for _ in 0..200 {
            world.integrate_completed_chunks();
            if world.manager.get_active_chunks().len() == expected {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[test]
    fn get_voxel_on_unloaded_region_is_air() {
        let dir = tempdir().unwrap();
        let world = World::new(config_at(dir.path()));
        assert_eq!(world.get_voxel(WorldPos::new(1000, 5, 1000)), VoxelKind::Air);
    }

    #[test]
    fn set_voxel_on_unloaded_region_fails() {
        let dir = tempdir().unwrap();
        let world = World::new(config_at(dir.path()));
        assert!(!world.set_voxel(WorldPos::new(1000, 5, 1000), VoxelKind::Stone));
    }

    #[test]
    fn set_and_get_voxel_roundtrip_once_resident() {
        let dir = tempdir().unwrap();
        let mut world = World::new(config_at(dir.path()));
        let pool = ThreadPool::new(2);
        world.update_chunks(Vec3::ZERO, &pool);
        drain(&world);

        assert!(world.set_voxel(WorldPos::new(1, 1, 1), VoxelKind::Diamond));
        assert_eq!(world.get_voxel(WorldPos::new(1, 1, 1)), VoxelKind::Diamond);
    }

    #[test]
    fn save_then_load_recovers_mutations() {
        let dir = tempdir().unwrap();
        let save_dir = dir.path().join("myworld");
        let mut world = World::new(config_at(&save_dir));
        let pool = ThreadPool::new(2);
        world.update_chunks(Vec3::ZERO, &pool);
        drain(&world);

        let positions = [
            WorldPos::new(0, 0, 0),
            WorldPos::new(3, 2, 1),
            WorldPos::new(7, 5, 7),
        ];
        for &pos in &positions {
            world.set_voxel(pos, VoxelKind::Gold);
        }

        let written = world.save().expect("save succeeds");
        assert!(written > 0);

        let reloaded = World::load(&save_dir.to_string_lossy()).expect("load succeeds");
        assert_eq!(reloaded.config().seed, 5);
        assert_eq!(reloaded.config().chunk_size, 8);
        assert_eq!(reloaded.config().world_height, 16);

        for &pos in &positions {
            let chunk_pos = reloaded.manager.world_to_chunk_pos(pos);
            let raw = fileio::load_from_file(&crate::chunk_manager::chunk_file_path(
                &reloaded.config().save_directory,
                chunk_pos,
            ));
            let chunk = Chunk::deserialize(&raw).expect("chunk file present after save");
            let local = reloaded.manager.world_to_local_pos(pos);
            assert_eq!(chunk.get_voxel(local.x, local.y, local.z), VoxelKind::Gold);
        }
    }

    #[test]
    fn load_missing_world_fails() {
        let dir = tempdir().unwrap();
        let err = World::load(&dir.path().join("nope").to_string_lossy());
        assert!(err.is_err());
    }
}
