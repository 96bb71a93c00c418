//! Hand-rolled gradient noise.
//!
//! Deliberately not built on the `noise` crate: the permutation table, corner
//! gradients, and fade curve below are the literal forms needed for
//! byte-identical generation across runs of the same build, which an
//! off-the-shelf noise crate's internals don't promise to preserve.

use rand::seq::SliceRandom;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A seeded gradient-noise source with fixed 2D/3D base primitives and
/// fractal (octave-summed) variants built on top of them.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    perm: [u8; 512],
}

impl NoiseGenerator {
    /// Builds a new generator, shuffling a 0..256 permutation table with a
    /// `seed`-derived RNG and duplicating it to 512 entries for wraparound-free
    /// indexing.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        let mut values: Vec<u8> = (0..=255).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        values.shuffle(&mut rng);

        let mut perm = [0u8; 512];
        for i in 0..256 {
            perm[i] = values[i];
            perm[i + 256] = values[i];
        }
        Self { perm }
    }

    #[inline]
    fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + t * (b - a)
    }

    #[inline]
    fn smooth_step(t: f32) -> f32 {
        t * t * (3.0 - 2.0 * t)
    }

    #[inline]
    fn gradient_2d(hash: i32, x: f32, y: f32) -> f32 {
        let h = hash & 7;
        let u = if h < 4 { x } else { y };
        let v = if h < 4 { y } else { x };
        (if h & 1 != 0 { -u } else { u }) + (if h & 2 != 0 { -2.0 * v } else { 2.0 * v })
    }

    #[inline]
    fn gradient_3d(hash: i32, x: f32, y: f32, z: f32) -> f32 {
        let h = hash & 15;
        let u = if h < 8 { x } else { y };
        let v = if h < 4 {
            y
        } else if h == 12 || h == 14 {
            x
        } else {
            z
        };
        (if h & 1 != 0 { -u } else { u }) + (if h & 2 != 0 { -v } else { v })
    }

    #[inline]
    fn perm(&self, i: i32) -> i32 {
        i32::from(self.perm[(i & 511) as usize])
    }

    /// Single-octave 2D Perlin noise, roughly in `[-1, 1]`.
    #[must_use]
    pub fn base_perlin_2d(&self, x: f32, y: f32) -> f32 {
        let xi = x.floor() as i32 & 255;
        let yi = y.floor() as i32 & 255;

        let xf = x - x.floor();
        let yf = y - y.floor();

        let u = Self::smooth_step(xf);
        let v = Self::smooth_step(yf);

        let a = self.perm(xi) + yi;
        let b = self.perm(xi + 1) + yi;
        let aa = self.perm(a);
        let ba = self.perm(b);
        let ab = self.perm(a + 1);
        let bb = self.perm(b + 1);

        let g00 = Self::gradient_2d(self.perm(aa), xf, yf);
        let g10 = Self::gradient_2d(self.perm(ba), xf - 1.0, yf);
        let g01 = Self::gradient_2d(self.perm(ab), xf, yf - 1.0);
        let g11 = Self::gradient_2d(self.perm(bb), xf - 1.0, yf - 1.0);

        let x1 = Self::lerp(g00, g10, u);
        let x2 = Self::lerp(g01, g11, u);
        Self::lerp(x1, x2, v)
    }

    /// Single-octave 3D Perlin noise, roughly in `[-1, 1]`.
    #[must_use]
    pub fn base_perlin_3d(&self, x: f32, y: f32, z: f32) -> f32 {
        let xi = x.floor() as i32 & 255;
        let yi = y.floor() as i32 & 255;
        let zi = z.floor() as i32 & 255;

        let xf = x - x.floor();
        let yf = y - y.floor();
        let zf = z - z.floor();

        let u = Self::smooth_step(xf);
        let v = Self::smooth_step(yf);
        let w = Self::smooth_step(zf);

        let a = self.perm(xi) + yi;
        let b = self.perm(xi + 1) + yi;
        let aa = self.perm(a) + zi;
        let ba = self.perm(b) + zi;
        let ab = self.perm(a + 1) + zi;
        let bb = self.perm(b + 1) + zi;

        let g000 = Self::gradient_3d(self.perm(aa), xf, yf, zf);
        let g100 = Self::gradient_3d(self.perm(ba), xf - 1.0, yf, zf);
        let g010 = Self::gradient_3d(self.perm(ab), xf, yf - 1.0, zf);
        let g110 = Self::gradient_3d(self.perm(bb), xf - 1.0, yf - 1.0, zf);
        let g001 = Self::gradient_3d(self.perm(aa + 1), xf, yf, zf - 1.0);
        let g101 = Self::gradient_3d(self.perm(ba + 1), xf - 1.0, yf, zf - 1.0);
        let g011 = Self::gradient_3d(self.perm(ab + 1), xf, yf - 1.0, zf - 1.0);
        let g111 = Self::gradient_3d(self.perm(bb + 1), xf - 1.0, yf - 1.0, zf - 1.0);

        let x1 = Self::lerp(g000, g100, u);
        let x2 = Self::lerp(g010, g110, u);
        let y1 = Self::lerp(x1, x2, v);

        let x3 = Self::lerp(g001, g101, u);
        let x4 = Self::lerp(g011, g111, u);
        let y2 = Self::lerp(x3, x4, v);

        Self::lerp(y1, y2, w)
    }

    /// Octave-summed (fractal Brownian motion) 2D noise.
    #[must_use]
    pub fn perlin_2d(
        &self,
        x: f32,
        z: f32,
        scale: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut frequency = scale;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.base_perlin_2d(x * frequency, z * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_value
    }

    /// Octave-summed (fractal Brownian motion) 3D noise.
    #[must_use]
    pub fn perlin_3d(
        &self,
        x: f32,
        y: f32,
        z: f32,
        scale: f32,
        octaves: u32,
        persistence: f32,
        lacunarity: f32,
    ) -> f32 {
        let mut total = 0.0;
        let mut frequency = scale;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.base_perlin_3d(x * frequency, y * frequency, z * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_value
    }
}
