//! Fixed-size packed voxel storage for a single chunk, plus its fixed-layout
//! binary serialization (§4.B).

use parking_lot::Mutex;
use talus_core::{ChunkPos, Error, Result};

use crate::palette::Palette;
use crate::voxel::VoxelKind;

/// Minimum byte length of a serialized chunk: 12 (position) + 2 (size) +
/// 2 (height) + 1 (palette length).
const HEADER_LEN: usize = 17;

struct ChunkInner {
    size: u16,
    height: u16,
    voxels: Vec<u8>,
    palette: Palette,
    generated: bool,
    dirty: bool,
}

impl ChunkInner {
    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let size = i64::from(self.size);
        let y = i64::from(y);
        let z = i64::from(z);
        let x = i64::from(x);
        (y * size * size + z * size + x) as usize
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0
            && x < i32::from(self.size)
            && y >= 0
            && y < i32::from(self.height)
            && z >= 0
            && z < i32::from(self.size)
    }
}

/// A `size × height × size` region of voxels at a fixed chunk-space
/// position. All voxel reads/writes and serialization share one internal
/// mutex, matching the per-chunk lock granularity required by §5.
pub struct Chunk {
    pos: ChunkPos,
    inner: Mutex<ChunkInner>,
}

impl Chunk {
    /// Builds an all-Air chunk with a fresh palette.
    #[must_use]
    pub fn new(pos: ChunkPos, size: u16, height: u16) -> Self {
        let cell_count = usize::from(size) * usize::from(size) * usize::from(height);
        Self {
            pos,
            inner: Mutex::new(ChunkInner {
                size,
                height,
                voxels: vec![0u8; cell_count],
                palette: Palette::new(),
                generated: false,
                dirty: false,
            }),
        }
    }

    #[must_use]
    pub fn position(&self) -> ChunkPos {
        self.pos
    }

    #[must_use]
    pub fn size(&self) -> u16 {
        self.inner.lock().size
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.inner.lock().height
    }

    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.inner.lock().generated
    }

    pub fn set_generated(&self, generated: bool) {
        self.inner.lock().generated = generated;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().dirty
    }

    pub fn set_dirty(&self, dirty: bool) {
        self.inner.lock().dirty = dirty;
    }

    /// Returns `Air` for out-of-bounds coordinates rather than panicking.
    #[must_use]
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> VoxelKind {
        let inner = self.inner.lock();
        if !inner.in_bounds(x, y, z) {
            return VoxelKind::Air;
        }
        let idx = inner.index(x, y, z);
        inner.palette.get_type(inner.voxels[idx])
    }

    /// Out-of-bounds writes are silently ignored.
    pub fn set_voxel(&self, x: i32, y: i32, z: i32, kind: VoxelKind) {
        let mut inner = self.inner.lock();
        if !inner.in_bounds(x, y, z) {
            return;
        }
        let idx = inner.index(x, y, z);
        let tag = inner.palette.add_type(kind);
        inner.voxels[idx] = tag;
        inner.dirty = true;
    }

    /// Resets the palette and zeroes the voxel array; marks the chunk dirty.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.palette.reset();
        inner.voxels.fill(0);
        inner.dirty = true;
    }

    /// Runs `f` with direct, lock-held access to the raw voxel bytes and
    /// palette. Used by generation and physics so they can do whole-chunk
    /// work under one lock acquisition instead of per-cell locking.
    pub fn with_raw_mut<R>(&self, f: impl FnOnce(&mut [u8], &mut Palette, u16, u16) -> R) -> R {
        let mut inner = self.inner.lock();
        let ChunkInner {
            size,
            height,
            voxels,
            palette,
            ..
        } = &mut *inner;
        f(voxels, palette, *size, *height)
    }

    /// Serializes position, size, height, palette, and the packed voxel
    /// array into the fixed little-endian layout described in §4.B. The
    /// palette length is written as a single byte, so [`Palette`] caps
    /// itself at [`crate::palette::MAX_PALETTE_SIZE`] (255) entries rather
    /// than 256 — a 256-entry palette would serialize its own length as 0.
    #[must_use]
    pub fn serialize(&self) -> Vec<u8> {
        let inner = self.inner.lock();
        let mut out = Vec::with_capacity(HEADER_LEN + inner.palette.len() + inner.voxels.len());

        out.extend_from_slice(&self.pos.cx.to_le_bytes());
        out.extend_from_slice(&self.pos.cy.to_le_bytes());
        out.extend_from_slice(&self.pos.cz.to_le_bytes());
        out.extend_from_slice(&inner.size.to_le_bytes());
        out.extend_from_slice(&inner.height.to_le_bytes());

        out.push(inner.palette.len() as u8);
        for kind in inner.palette.entries() {
            out.push(kind.tag());
        }

        out.extend_from_slice(&inner.voxels);
        out
    }

    /// Rebuilds a chunk from `data` serialized by [`Chunk::serialize`].
    /// Rejects inputs shorter than the fixed header or whose declared
    /// palette/array size would overrun the buffer. `size`/`height` in the
    /// stream take precedence over any constructor-time values.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_LEN {
            return Err(Error::InvalidData(format!(
                "chunk data too small: {} bytes, need at least {HEADER_LEN}",
                data.len()
            )));
        }

        let cx = i32::from_le_bytes(data[0..4].try_into().unwrap());
        let cy = i32::from_le_bytes(data[4..8].try_into().unwrap());
        let cz = i32::from_le_bytes(data[8..12].try_into().unwrap());
        let size = u16::from_le_bytes(data[12..14].try_into().unwrap());
        let height = u16::from_le_bytes(data[14..16].try_into().unwrap());
        let palette_len = data[16] as usize;

        let mut offset = HEADER_LEN;
        if offset + palette_len > data.len() {
            return Err(Error::InvalidData(
                "palette length exceeds chunk data size".to_string(),
            ));
        }

        let mut palette = Palette::new();
        palette.reset();
        for &tag in &data[offset..offset + palette_len] {
            palette.add_type(VoxelKind::from_tag(tag));
        }
        offset += palette_len;

        let voxel_count = usize::from(size) * usize::from(size) * usize::from(height);
        if offset + voxel_count > data.len() {
            return Err(Error::InvalidData(
                "voxel array length exceeds chunk data size".to_string(),
            ));
        }

        let voxels = data[offset..offset + voxel_count].to_vec();

        Ok(Self {
            pos: ChunkPos::new(cx, cy, cz),
            inner: Mutex::new(ChunkInner {
                size,
                height,
                voxels,
                palette,
                generated: true,
                dirty: false,
            }),
        })
    }
}
