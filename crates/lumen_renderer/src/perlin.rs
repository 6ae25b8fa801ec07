//! Perlin gradient noise and the marble texture built on it.

use crate::random::random_vec;
use crate::{Color, Texture};
use lumen_math::Vec3;
use rand::seq::SliceRandom;
use rand::RngCore;

const POINT_COUNT: usize = 256;
const TURBULENCE_OCTAVES: usize = 7;

/// Lattice of random unit gradients hashed through three permutation tables.
pub struct Perlin {
    gradients: Vec<Vec3>,
    perm_x: Vec<usize>,
    perm_y: Vec<usize>,
    perm_z: Vec<usize>,
}

impl Perlin {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let gradients = (0..POINT_COUNT)
            .map(|_| random_vec(rng, -1.0, 1.0).normalize_or_zero())
            .collect();

        Self {
            gradients,
            perm_x: Self::generate_perm(rng),
            perm_y: Self::generate_perm(rng),
            perm_z: Self::generate_perm(rng),
        }
    }

    fn generate_perm(rng: &mut dyn RngCore) -> Vec<usize> {
        let mut perm: Vec<usize> = (0..POINT_COUNT).collect();
        perm.shuffle(rng);
        perm
    }

    /// Signed gradient noise at `p`, roughly in [-1, 1].
    pub fn noise(&self, p: Vec3) -> f32 {
        let cell = p.floor();
        let d = p - cell;
        let (x, y, z) = (cell.x as i32, cell.y as i32, cell.z as i32);

        // Hermite smoothing
        let s = d * d * (Vec3::splat(3.0) - 2.0 * d);

        let mut accum = 0.0;
        for i in 0..2 {
            for j in 0..2 {
                for k in 0..2 {
                    let hash = self.perm_x[(x.wrapping_add(i) & 255) as usize]
                        ^ self.perm_y[(y.wrapping_add(j) & 255) as usize]
                        ^ self.perm_z[(z.wrapping_add(k) & 255) as usize];
                    let offset = d - Vec3::new(i as f32, j as f32, k as f32);

                    let (fi, fj, fk) = (i as f32, j as f32, k as f32);
                    let weight = (fi * s.x + (1.0 - fi) * (1.0 - s.x))
                        * (fj * s.y + (1.0 - fj) * (1.0 - s.y))
                        * (fk * s.z + (1.0 - fk) * (1.0 - s.z));

                    accum += weight * self.gradients[hash].dot(offset);
                }
            }
        }
        accum
    }

    /// Sum of octaves with halving weight and doubling frequency.
    pub fn turbulence(&self, p: Vec3, depth: usize) -> f32 {
        let mut accum = 0.0;
        let mut temp = p;
        let mut weight = 1.0;

        for _ in 0..depth {
            accum += weight * self.noise(temp);
            weight *= 0.5;
            temp *= 2.0;
        }

        accum
    }
}

/// Grey marble: a sine wave along x phase-shifted by turbulence.
pub struct PerlinTexture {
    noise: Perlin,
}

impl PerlinTexture {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        Self {
            noise: Perlin::new(rng),
        }
    }
}

impl Texture for PerlinTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let turb = self.noise.turbulence(p, TURBULENCE_OCTAVES);
        Color::splat((1.0 + (4.0 * p.x + 10.0 * turb.abs()).sin()) * 0.5)
    }
}
