//! Sampling helpers over a caller-supplied generator.
//!
//! Every function takes `&mut dyn RngCore` so a render worker can thread its
//! own generator through the whole call tree.

use lumen_math::Vec3;
use rand::{Rng, RngCore};

/// Uniform float in [0, 1).
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniform float in [min, max).
#[inline]
pub fn gen_range(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    min + (max - min) * gen_f32(rng)
}

/// Vector with each component uniform in [min, max).
pub fn random_vec(rng: &mut dyn RngCore, min: f32, max: f32) -> Vec3 {
    Vec3::new(
        gen_range(rng, min, max),
        gen_range(rng, min, max),
        gen_range(rng, min, max),
    )
}

/// Generate a random unit vector on the unit sphere.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    // Use rejection sampling for uniform distribution on sphere
    loop {
        let v = random_vec(rng, -1.0, 1.0);
        let len_sq = v.length_squared();
        if len_sq > 1e-6 && len_sq <= 1.0 {
            return v / len_sq.sqrt();
        }
    }
}
