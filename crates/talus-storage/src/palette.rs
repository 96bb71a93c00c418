//! Per-chunk type→index palette.

use crate::voxel::VoxelKind;

/// Maximum number of distinct kinds a single chunk's palette may hold.
///
/// Capped at 255 rather than the full range an index byte can address: the
/// on-disk chunk format stores the palette length itself in a single byte
/// (§4.B), and a 256-entry palette would serialize its own length as 0. 255
/// keeps every valid length representable without widening that field.
pub const MAX_PALETTE_SIZE: usize = 255;

/// An ordered, bounded sequence of voxel kinds backing a chunk's packed
/// byte array. Index 0 is always `Air`.
#[derive(Clone, Debug)]
pub struct Palette {
    entries: Vec<VoxelKind>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new()
    }
}

impl Palette {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: vec![VoxelKind::Air],
        }
    }

    /// Returns the existing index for `kind` if present; otherwise appends
    /// it. When the palette is full, degrades to index 0 (Air) — a known
    /// soft-fail traded for forward progress (`PaletteOverflow`, logged by
    /// the caller that observed it).
    pub fn add_type(&mut self, kind: VoxelKind) -> u8 {
        if let Some(pos) = self.entries.iter().position(|&k| k == kind) {
            return pos as u8;
        }
        if self.entries.len() < MAX_PALETTE_SIZE {
            self.entries.push(kind);
            return (self.entries.len() - 1) as u8;
        }
        tracing::warn!("palette overflow past {MAX_PALETTE_SIZE} entries, falling back to Air");
        0
    }

    /// Returns `Air` for an out-of-range index rather than panicking.
    #[must_use]
    pub fn get_type(&self, index: u8) -> VoxelKind {
        self.entries
            .get(index as usize)
            .copied()
            .unwrap_or(VoxelKind::Air)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= MAX_PALETTE_SIZE
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false // Air is always present
    }

    #[must_use]
    pub fn entries(&self) -> &[VoxelKind] {
        &self.entries
    }

    /// Clears the palette back to `[Air]`.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.entries.push(VoxelKind::Air);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_is_index_zero_after_reset() {
        let mut palette = Palette::new();
        palette.add_type(VoxelKind::Stone);
        palette.reset();
        assert_eq!(palette.get_type(0), VoxelKind::Air);
        assert_eq!(palette.len(), 1);
    }

    #[test]
    fn add_type_returns_existing_index() {
        let mut palette = Palette::new();
        let a = palette.add_type(VoxelKind::Stone);
        let b = palette.add_type(VoxelKind::Stone);
        assert_eq!(a, b);
        assert_eq!(palette.len(), 2);
    }

    #[test]
    fn out_of_range_index_is_air() {
        let palette = Palette::new();
        assert_eq!(palette.get_type(250), VoxelKind::Air);
    }

    #[test]
    fn overflow_degrades_to_air_index() {
        let mut palette = Palette::new();
        // Air already occupies index 0; fill the remaining 255 slots with
        // distinct synthetic kinds by cycling through the real enum (it only
        // has 15 members, but add_type dedups, so instead push copies via a
        // controlled loop using every kind repeatedly won't overflow it).
        // Exercise overflow directly against the size cap instead.
        for _ in 0..(MAX_PALETTE_SIZE - 1) {
            palette.entries.push(VoxelKind::Stone);
        }
        assert!(palette.is_full());
        let idx = palette.add_type(VoxelKind::Diamond);
        assert_eq!(idx, 0);
    }
}
