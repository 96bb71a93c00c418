//! Voxel kinds and their static physical properties.

use std::sync::OnceLock;

/// The closed set of voxel kinds the engine knows about.
///
/// Numeric values are the on-disk tag written by chunk serialization
/// (§4.B) — do not reorder existing variants.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VoxelKind {
    #[default]
    Air = 0,
    Stone,
    Dirt,
    Grass,
    Sand,
    Water,
    Wood,
    Leaves,
    Coal,
    Iron,
    Gold,
    Diamond,
    Lava,
    Snow,
    Ice,
}

/// Number of variants in [`VoxelKind`]; keep in sync with the enum above.
pub const VOXEL_KIND_COUNT: usize = 15;

impl VoxelKind {
    /// Decode a palette/disk tag byte, falling back to `Air` for unknown tags
    /// rather than failing — the chunk invariant that every tag is valid is
    /// enforced at the palette layer, not here.
    #[must_use]
    pub fn from_tag(tag: u8) -> Self {
        match tag {
            0 => Self::Air,
            1 => Self::Stone,
            2 => Self::Dirt,
            3 => Self::Grass,
            4 => Self::Sand,
            5 => Self::Water,
            6 => Self::Wood,
            7 => Self::Leaves,
            8 => Self::Coal,
            9 => Self::Iron,
            10 => Self::Gold,
            11 => Self::Diamond,
            12 => Self::Lava,
            13 => Self::Snow,
            14 => Self::Ice,
            _ => Self::Air,
        }
    }

    #[must_use]
    pub const fn tag(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn properties(self) -> &'static VoxelProperties {
        &properties()[self.tag() as usize]
    }

    #[must_use]
    pub fn is_solid(self) -> bool {
        self.properties().is_solid
    }

    #[must_use]
    pub fn is_fluid(self) -> bool {
        self.properties().is_fluid
    }

    #[must_use]
    pub fn is_granular(self) -> bool {
        self.properties().is_granular
    }
}

/// Physical properties carried by every voxel kind, looked up from the
/// process-wide static table built by [`properties`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelProperties {
    pub is_solid: bool,
    pub is_fluid: bool,
    pub is_granular: bool,
    pub density: f32,
    pub friction: u8,
    pub luminosity: u8,
    /// Packed RGBA color, as `0xAARRGGBB`.
    pub color: u32,
}

const fn p(
    is_solid: bool,
    is_fluid: bool,
    is_granular: bool,
    density: f32,
    friction: u8,
    luminosity: u8,
    color: u32,
) -> VoxelProperties {
    VoxelProperties {
        is_solid,
        is_fluid,
        is_granular,
        density,
        friction,
        luminosity,
        color,
    }
}

/// Returns the process-wide voxel property table, built exactly once.
pub fn properties() -> &'static [VoxelProperties; VOXEL_KIND_COUNT] {
    static TABLE: OnceLock<[VoxelProperties; VOXEL_KIND_COUNT]> = OnceLock::new();
    TABLE.get_or_init(|| {
        [
            p(false, false, false, 0.0, 0, 0, 0x0000_0000), // Air
            p(true, false, false, 2.5, 128, 0, 0xFF88_8888), // Stone
            p(true, false, false, 1.5, 100, 0, 0xFF8B_4513), // Dirt
            p(true, false, false, 1.5, 100, 0, 0xFF00_AA00), // Grass
            p(true, false, true, 1.6, 120, 0, 0xFFEE_DD44),  // Sand
            p(false, true, false, 1.0, 20, 0, 0x8800_AAFF),  // Water
            p(true, false, false, 0.8, 80, 0, 0xFF8B_5A2B),  // Wood
            p(true, false, false, 0.2, 40, 0, 0xAA00_CC00),  // Leaves
            p(true, false, false, 1.5, 90, 0, 0xFF22_2222),  // Coal
            p(true, false, false, 7.8, 150, 0, 0xFFCC_CCCC), // Iron
            p(true, false, false, 19.3, 120, 0, 0xFFFF_D700), // Gold
            p(true, false, false, 3.5, 200, 0, 0xFF00_FFFF), // Diamond
            p(false, true, false, 3.1, 50, 15, 0xFFFF_4400), // Lava
            p(true, false, true, 0.1, 40, 0, 0xFFFF_FFFF),   // Snow
            p(true, false, false, 0.92, 10, 0, 0xDDAA_EEFF), // Ice
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_roundtrip() {
        for tag in 0u8..VOXEL_KIND_COUNT as u8 {
            let kind = VoxelKind::from_tag(tag);
            assert_eq!(kind.tag(), tag);
        }
    }

    #[test]
    fn unknown_tag_falls_back_to_air() {
        assert_eq!(VoxelKind::from_tag(200), VoxelKind::Air);
    }

    #[test]
    fn air_is_inert() {
        let props = VoxelKind::Air.properties();
        assert!(!props.is_solid);
        assert!(!props.is_fluid);
        assert!(!props.is_granular);
    }

    #[test]
    fn sand_and_snow_are_granular() {
        assert!(VoxelKind::Sand.is_granular());
        assert!(VoxelKind::Snow.is_granular());
        assert!(!VoxelKind::Stone.is_granular());
    }

    #[test]
    fn water_and_lava_are_fluid() {
        assert!(VoxelKind::Water.is_fluid());
        assert!(VoxelKind::Lava.is_fluid());
        assert!(!VoxelKind::Ice.is_fluid());
    }

    #[test]
    fn lava_emits_light() {
        assert_eq!(VoxelKind::Lava.properties().luminosity, 15);
    }

    #[test]
    fn properties_table_is_stable_across_calls() {
        let a = properties() as *const _;
        let b = properties() as *const _;
        assert_eq!(a, b, "table should be built once and reused");
    }
}
