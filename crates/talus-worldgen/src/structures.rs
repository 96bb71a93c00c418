//! Block-stamp structure templates, placement, and the lighter-weight
//! per-column decoration pass (§4.I).

use rand::Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;
use talus_core::NoiseGenerator;
use talus_storage::{Chunk, VoxelKind};

use crate::biome::{biome_at, Biome};

/// Sampling stride for the structure-placement scan; checking every 4th
/// column keeps structure density sane without a separate density knob.
const SAMPLE_STRIDE: i32 = 4;
const STRUCTURE_CHANCE: f32 = 0.1;
const DECORATION_CHANCE: f32 = 0.05;

/// The families of block-stamp templates the generator can place.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Tree,
    Rock,
    Flower,
    Cactus,
}

/// A 3D bounding-box stamp: cells are either `Air` (skipped on placement) or
/// a solid kind.
pub struct StructureTemplate {
    size_x: i32,
    size_y: i32,
    size_z: i32,
    blocks: Vec<VoxelKind>,
}

impl StructureTemplate {
    fn new(size_x: i32, size_y: i32, size_z: i32) -> Self {
        Self {
            size_x,
            size_y,
            size_z,
            blocks: vec![VoxelKind::Air; (size_x * size_y * size_z) as usize],
        }
    }

    #[inline]
    fn index(&self, x: i32, y: i32, z: i32) -> usize {
        (y * self.size_x * self.size_z + z * self.size_x + x) as usize
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < self.size_x && y >= 0 && y < self.size_y && z >= 0 && z < self.size_z
    }

    fn block(&self, x: i32, y: i32, z: i32) -> VoxelKind {
        if !self.in_bounds(x, y, z) {
            return VoxelKind::Air;
        }
        self.blocks[self.index(x, y, z)]
    }

    fn set(&mut self, x: i32, y: i32, z: i32, kind: VoxelKind) {
        if !self.in_bounds(x, y, z) {
            return;
        }
        let idx = self.index(x, y, z);
        self.blocks[idx] = kind;
    }
}

fn small_tree() -> StructureTemplate {
    let mut t = StructureTemplate::new(3, 5, 3);
    for y in 0..3 {
        t.set(1, y, 1, VoxelKind::Wood);
    }
    for y in 3..=4 {
        for z in 0..3 {
            for x in 0..3 {
                if x == 1 && z == 1 && y == 3 {
                    t.set(x, y, z, VoxelKind::Wood); // trunk extends one cell into the canopy
                } else {
                    t.set(x, y, z, VoxelKind::Leaves);
                }
            }
        }
    }
    t
}

fn large_tree() -> StructureTemplate {
    let mut t = StructureTemplate::new(5, 8, 5);
    for y in 0..5 {
        t.set(2, y, 2, VoxelKind::Wood);
    }
    for y in 4..=7 {
        let radius = if y < 6 { 2 } else { 1 };
        for z in (2 - radius)..=(2 + radius) {
            for x in (2 - radius)..=(2 + radius) {
                if x == 2 && z == 2 && y <= 5 {
                    t.set(x, y, z, VoxelKind::Wood);
                } else {
                    t.set(x, y, z, VoxelKind::Leaves);
                }
            }
        }
    }
    t
}

fn rock() -> StructureTemplate {
    let mut t = StructureTemplate::new(3, 2, 3);
    for z in 0..3 {
        for x in 0..3 {
            t.set(x, 0, z, VoxelKind::Stone);
        }
    }
    t.set(1, 1, 1, VoxelKind::Stone);
    t
}

fn flower() -> StructureTemplate {
    let mut t = StructureTemplate::new(1, 1, 1);
    t.set(0, 0, 0, VoxelKind::Grass);
    t
}

fn cactus() -> StructureTemplate {
    let mut t = StructureTemplate::new(1, 3, 1);
    for y in 0..3 {
        t.set(0, y, 0, VoxelKind::Wood);
    }
    t
}

fn templates_for(kind: StructureKind) -> Vec<StructureTemplate> {
    match kind {
        StructureKind::Tree => vec![small_tree(), large_tree()],
        StructureKind::Rock => vec![rock()],
        StructureKind::Flower => vec![flower()],
        StructureKind::Cactus => vec![cactus()],
    }
}

/// Structure kinds a biome may spawn; an empty slice means the biome never
/// places structures (e.g. `Ocean`).
fn valid_structures_for_biome(biome: Biome) -> &'static [StructureKind] {
    match biome {
        Biome::Plains => &[
            StructureKind::Tree,
            StructureKind::Rock,
            StructureKind::Flower,
        ],
        Biome::Forest => &[StructureKind::Tree, StructureKind::Flower],
        Biome::Desert => &[StructureKind::Rock, StructureKind::Cactus],
        Biome::Mountains => &[StructureKind::Rock],
        Biome::Taiga | Biome::Tundra => &[StructureKind::Tree, StructureKind::Rock],
        Biome::Swamp => &[StructureKind::Tree],
        Biome::Ocean => &[],
    }
}

fn decoration_for_biome(rng: &mut ChaCha8Rng, biome: Biome) -> Option<VoxelKind> {
    match biome {
        Biome::Plains | Biome::Forest => Some(VoxelKind::Grass),
        Biome::Desert => Some(if rng.gen_bool(0.5) {
            VoxelKind::Wood
        } else {
            VoxelKind::Dirt
        }),
        Biome::Taiga | Biome::Tundra => Some(VoxelKind::Snow),
        Biome::Swamp => Some(VoxelKind::Dirt),
        Biome::Ocean | Biome::Mountains => None,
    }
}

/// Per-cell deterministic RNG keyed off the world seed, the sampled biome,
/// the chunk coordinate, and the cell offset within it — placement is
/// reproducible regardless of the order the scan visits cells in (§4.I).
fn cell_rng(seed: u32, salt: u64, biome: Biome, cx: i32, cz: i32, x: i32, z: i32) -> ChaCha8Rng {
    let mixed = u64::from(seed)
        ^ salt.wrapping_mul(0xA24B_AED4_963E_E407)
        ^ (biome as u64).wrapping_mul(0x1000_0000_01)
        ^ (cx as u32 as u64).wrapping_mul(0x9E37_79B1)
        ^ (cz as u32 as u64)
            .wrapping_mul(0x27D4_EB2F)
            .rotate_left(32)
        ^ (x as u32 as u64)
            .wrapping_mul(0xC2B2_AE3D)
            .rotate_left(16)
        ^ (z as u32 as u64)
            .wrapping_mul(0x1656_67B1)
            .rotate_left(48);
    ChaCha8Rng::seed_from_u64(mixed)
}

fn surface_height(chunk: &Chunk, x: i32, z: i32, height: i32) -> Option<i32> {
    for y in (0..height).rev() {
        let v = chunk.get_voxel(x, y, z);
        if v != VoxelKind::Air && v != VoxelKind::Water {
            return Some(y);
        }
    }
    None
}

/// A structure fits only if its bounding box stays within the chunk and
/// every footprint cell directly beneath it is solid ground (not Air or
/// Water).
fn can_place(
    chunk: &Chunk,
    t: &StructureTemplate,
    x: i32,
    y: i32,
    z: i32,
    chunk_size: i32,
    chunk_height: i32,
) -> bool {
    if y <= 0 || x + t.size_x > chunk_size || y + t.size_y > chunk_height || z + t.size_z > chunk_size
    {
        return false;
    }
    for sz in 0..t.size_z {
        for sx in 0..t.size_x {
            let below = chunk.get_voxel(x + sx, y - 1, z + sz);
            if below == VoxelKind::Air || below == VoxelKind::Water {
                return false;
            }
        }
    }
    true
}

fn stamp(chunk: &Chunk, t: &StructureTemplate, x: i32, y: i32, z: i32) {
    for sy in 0..t.size_y {
        for sz in 0..t.size_z {
            for sx in 0..t.size_x {
                let block = t.block(sx, sy, sz);
                if block == VoxelKind::Air {
                    continue;
                }
                chunk.set_voxel(x + sx, y + sy, z + sz, block);
            }
        }
    }
}

/// Samples a 4×4 grid of columns across `chunk`, rolling a 10% chance per
/// sample to stamp a biome-appropriate structure template at the surface.
pub fn generate_structures(
    chunk: &Chunk,
    noise: &NoiseGenerator,
    seed: u32,
    temperature_scale: f32,
    humidity_scale: f32,
) {
    let pos = chunk.position();
    let size = i32::from(chunk.size());
    let height = i32::from(chunk.height());
    let world_x0 = pos.cx * size;
    let world_z0 = pos.cz * size;

    let mut sz = 0;
    while sz < size {
        let mut sx = 0;
        while sx < size {
            let biome = biome_at(
                noise,
                world_x0 + sx,
                world_z0 + sz,
                temperature_scale,
                humidity_scale,
            );
            let valid = valid_structures_for_biome(biome);
            if valid.is_empty() {
                sx += SAMPLE_STRIDE;
                continue;
            }

            let mut rng = cell_rng(seed, 0, biome, pos.cx, pos.cz, sx, sz);
            if rng.gen_range(0.0f32..1.0) < STRUCTURE_CHANCE {
                let kind = valid[rng.gen_range(0..valid.len())];
                let templates = templates_for(kind);
                let template = &templates[rng.gen_range(0..templates.len())];

                if let Some(surface_y) = surface_height(chunk, sx, sz, height) {
                    let place_y = surface_y + 1;
                    if can_place(chunk, template, sx, place_y, sz, size, height) {
                        stamp(chunk, template, sx, place_y, sz);
                    }
                }
            }

            sx += SAMPLE_STRIDE;
        }
        sz += SAMPLE_STRIDE;
    }
}

/// Runs a per-column 5% decoration roll (flowers, cacti, snow-capped rocks,
/// mud) over every column of `chunk`, independent of the structure pass.
pub fn generate_decorations(
    chunk: &Chunk,
    noise: &NoiseGenerator,
    seed: u32,
    temperature_scale: f32,
    humidity_scale: f32,
) {
    let pos = chunk.position();
    let size = i32::from(chunk.size());
    let height = i32::from(chunk.height());
    let world_x0 = pos.cx * size;
    let world_z0 = pos.cz * size;

    for z in 0..size {
        for x in 0..size {
            let biome = biome_at(
                noise,
                world_x0 + x,
                world_z0 + z,
                temperature_scale,
                humidity_scale,
            );
            let mut rng = cell_rng(seed, 1, biome, pos.cx, pos.cz, x, z);
            let Some(decoration) = decoration_for_biome(&mut rng, biome) else {
                continue;
            };
            if rng.gen_range(0.0f32..1.0) >= DECORATION_CHANCE {
                continue;
            }
            let Some(surface_y) = surface_height(chunk, x, z, height) else {
                continue;
            };
            let y = surface_y + 1;
            if y >= height {
                continue;
            }
            chunk.set_voxel(x, y, z, decoration);
        }
    }
}
