//! Material trait for surface scattering.
//!
//! Every material carries a base colour (albedo) and an optional texture.
//! When a texture is present the colour used is `albedo * texture(u, v, p)`.

use std::sync::Arc;

use crate::random::{gen_f32, random_unit_vector};
use crate::{hittable::HitRecord, Texture};
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Color type alias (RGB values typically 0-1)
pub type Color = Vec3;

/// Result of a successful scatter: the new ray and how much it is attenuated.
#[derive(Debug, Clone, Copy)]
pub struct ScatterResult {
    pub attenuation: Color,
    pub scattered: Ray,
}

/// Trait for materials that describe how light interacts with surfaces.
pub trait Material: Send + Sync {
    /// Scatter an incoming ray.
    ///
    /// Returns `None` if the ray is absorbed.
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult>;

    /// Get emitted light from this material.
    ///
    /// Most materials return black (no emission).
    fn emitted(&self, _u: f32, _v: f32, _p: Vec3) -> Color {
        Color::ZERO
    }
}

/// Albedo modulated by an optional texture.
#[derive(Clone)]
struct Tint {
    albedo: Color,
    texture: Option<Arc<dyn Texture>>,
}

impl Tint {
    fn new(albedo: Color, texture: Option<Arc<dyn Texture>>) -> Self {
        Self { albedo, texture }
    }

    #[inline]
    fn color(&self, u: f32, v: f32, p: Vec3) -> Color {
        match &self.texture {
            Some(texture) => self.albedo * texture.value(u, v, p),
            None => self.albedo,
        }
    }
}

/// Lambertian (diffuse) material.
#[derive(Clone)]
pub struct Lambertian {
    tint: Tint,
}

impl Lambertian {
    /// Create a new Lambertian material with the given albedo color.
    pub fn new(albedo: Color) -> Self {
        Self {
            tint: Tint::new(albedo, None),
        }
    }

    /// A diffuse surface coloured entirely by a texture.
    pub fn textured(texture: Arc<dyn Texture>) -> Self {
        Self::with_texture(Color::ONE, texture)
    }

    /// A diffuse surface whose texture is scaled by `albedo`.
    pub fn with_texture(albedo: Color, texture: Arc<dyn Texture>) -> Self {
        Self {
            tint: Tint::new(albedo, Some(texture)),
        }
    }
}

impl Material for Lambertian {
    fn scatter(
        &self,
        _ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Scatter in a random direction on the hemisphere around the normal
        let mut scatter_direction = rec.normal + random_unit_vector(rng);

        // Catch degenerate scatter direction
        if scatter_direction.length_squared() < 1e-8 {
            scatter_direction = rec.normal;
        }

        Some(ScatterResult {
            attenuation: self.tint.color(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, scatter_direction),
        })
    }
}

/// Metal (specular) material.
#[derive(Clone)]
pub struct Metal {
    tint: Tint,
    fuzz: f32,
}

impl Metal {
    /// Create a new Metal material.
    ///
    /// - `albedo`: The color of the metal
    /// - `fuzz`: Roughness, 0.0 = perfect mirror, 1.0 = very rough
    pub fn new(albedo: Color, fuzz: f32) -> Self {
        Self {
            tint: Tint::new(albedo, None),
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    /// A metal whose reflectance is modulated by a texture.
    pub fn with_texture(albedo: Color, texture: Arc<dyn Texture>, fuzz: f32) -> Self {
        Self {
            tint: Tint::new(albedo, Some(texture)),
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }
}

impl Material for Metal {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let mut scattered_dir = reflect(ray_in.direction().normalize(), rec.normal);
        if self.fuzz > f32::EPSILON {
            scattered_dir += self.fuzz * random_unit_vector(rng);
        }

        // Only scatter if the reflected ray is in the same hemisphere as the normal
        if scattered_dir.dot(rec.normal) > 0.0 {
            Some(ScatterResult {
                attenuation: self.tint.color(rec.u, rec.v, rec.p),
                scattered: Ray::new(rec.p, scattered_dir),
            })
        } else {
            None
        }
    }
}

/// Dielectric (glass) material.
#[derive(Clone)]
pub struct Dielectric {
    /// Index of refraction
    ior: f32,
    tint: Tint,
}

impl Dielectric {
    /// Create a new clear Dielectric material.
    ///
    /// - `ior`: Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    pub fn new(ior: f32) -> Self {
        Self {
            ior,
            tint: Tint::new(Color::ONE, None),
        }
    }

    /// Tinted glass.
    pub fn with_albedo(ior: f32, albedo: Color) -> Self {
        Self {
            ior,
            tint: Tint::new(albedo, None),
        }
    }

    /// Glass whose transmission colour comes from a texture.
    pub fn with_texture(ior: f32, albedo: Color, texture: Arc<dyn Texture>) -> Self {
        Self {
            ior,
            tint: Tint::new(albedo, Some(texture)),
        }
    }

    /// Schlick's approximation for reflectance.
    pub fn reflectance(cosine: f32, ior: f32) -> f32 {
        let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
        r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
    }
}

impl Material for Dielectric {
    fn scatter(
        &self,
        ray_in: &Ray,
        rec: &HitRecord,
        rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        let refraction_ratio = if rec.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        let unit_direction = ray_in.direction().normalize();
        let cos_theta = (-unit_direction).dot(rec.normal).min(1.0);
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        // Check for total internal reflection
        let cannot_refract = refraction_ratio * sin_theta > 1.0;

        let direction =
            if cannot_refract || Self::reflectance(cos_theta, refraction_ratio) > gen_f32(rng) {
                reflect(unit_direction, rec.normal)
            } else {
                refract(unit_direction, rec.normal, refraction_ratio)
            };

        Some(ScatterResult {
            attenuation: self.tint.color(rec.u, rec.v, rec.p),
            scattered: Ray::new(rec.p, direction),
        })
    }
}

/// Diffuse light emitter.
#[derive(Clone)]
pub struct DiffuseLight {
    tint: Tint,
}

impl DiffuseLight {
    /// Create a new diffuse light with the given emission color.
    pub fn new(emit: Color) -> Self {
        Self {
            tint: Tint::new(emit, None),
        }
    }

    /// A light whose emission is `emit * texture(u, v, p)`.
    pub fn with_texture(emit: Color, texture: Arc<dyn Texture>) -> Self {
        Self {
            tint: Tint::new(emit, Some(texture)),
        }
    }
}

impl Material for DiffuseLight {
    fn scatter(
        &self,
        _ray_in: &Ray,
        _rec: &HitRecord,
        _rng: &mut dyn RngCore,
    ) -> Option<ScatterResult> {
        // Lights don't scatter rays
        None
    }

    fn emitted(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.tint.color(u, v, p)
    }
}

// =============================================================================
// Helper functions
// =============================================================================

/// Reflect a vector about a normal.
#[inline]
fn reflect(v: Vec3, n: Vec3) -> Vec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract a vector through a surface.
#[inline]
fn refract(uv: Vec3, n: Vec3, etai_over_etat: f32) -> Vec3 {
    let cos_theta = (-uv).dot(n).min(1.0);
    let r_out_perp = etai_over_etat * (uv + cos_theta * n);
    let r_out_parallel = -(1.0 - r_out_perp.length_squared()).abs().sqrt() * n;
    r_out_perp + r_out_parallel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CheckerTexture;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn record<'a>(material: &'a dyn Material, incoming: &Ray) -> HitRecord<'a> {
        // Hit on the z = 0 plane, outward normal +Z
        HitRecord::new(incoming, 1.0, Vec3::Z, (0.25, 0.75), material)
    }

    #[test]
    fn test_reflectance_at_normal_incidence() {
        for ior in [1.0_f32, 1.33, 1.5, 2.4] {
            let r0 = ((1.0 - ior) / (1.0 + ior)).powi(2);
            assert_eq!(Dielectric::reflectance(1.0, ior), r0);
        }
        // Grazing incidence reflects everything
        assert!((Dielectric::reflectance(0.0, 1.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_lambertian_scatters_into_hemisphere() {
        let material = Lambertian::new(Color::new(0.8, 0.3, 0.1));
        let incoming = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = record(&material, &incoming);
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..100 {
            let result = material.scatter(&incoming, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.8, 0.3, 0.1));
            assert_eq!(result.scattered.origin(), rec.p);
            assert!(result.scattered.direction().dot(rec.normal) >= 0.0);
        }
    }

    #[test]
    fn test_textured_lambertian_modulates_albedo() {
        let checker = Arc::new(CheckerTexture::new(Color::ONE, Color::ZERO, 1.0));
        let material = Lambertian::with_texture(Color::new(0.5, 0.5, 0.5), checker);
        let incoming = Ray::new(Vec3::new(0.5, 0.5, 1.5), Vec3::NEG_Z);
        let rec = record(&material, &incoming);
        let mut rng = StdRng::seed_from_u64(5);

        // Hit point (0.5, 0.5, 0.5) falls in the even cell
        let result = material.scatter(&incoming, &rec, &mut rng).unwrap();
        assert_eq!(result.attenuation, Color::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_metal_mirror_reflection() {
        let material = Metal::new(Color::ONE, 0.0);
        let incoming = Ray::new(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 0.0, -1.0));
        let rec = record(&material, &incoming);
        let mut rng = StdRng::seed_from_u64(5);

        let result = material.scatter(&incoming, &rec, &mut rng).unwrap();
        let expected = Vec3::new(1.0, 0.0, 1.0).normalize();
        assert!((result.scattered.direction() - expected).length() < 1e-5);
    }

    #[test]
    fn test_metal_fuzz_is_clamped() {
        let metal = Metal::new(Color::ONE, 7.0);
        assert_eq!(metal.fuzz, 1.0);
    }

    #[test]
    fn test_dielectric_always_scatters_with_albedo() {
        let material = Dielectric::with_albedo(1.5, Color::new(0.9, 1.0, 0.9));
        let incoming = Ray::new(Vec3::new(0.3, 0.0, 1.0), Vec3::new(-0.3, 0.0, -1.0));
        let rec = record(&material, &incoming);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..50 {
            let result = material.scatter(&incoming, &rec, &mut rng).unwrap();
            assert_eq!(result.attenuation, Color::new(0.9, 1.0, 0.9));
        }
    }

    #[test]
    fn test_dielectric_total_internal_reflection() {
        // Leaving glass at a grazing angle can't refract
        let material = Dielectric::new(1.5);
        let incoming = Ray::new(Vec3::new(-1.0, 0.0, -0.1), Vec3::new(1.0, 0.0, 0.1));
        let rec = record(&material, &incoming);
        assert!(!rec.front_face);

        let mut rng = StdRng::seed_from_u64(3);
        let result = material.scatter(&incoming, &rec, &mut rng).unwrap();
        assert!(result.scattered.direction().z < 0.0);
    }

    #[test]
    fn test_diffuse_light_emits_and_absorbs() {
        let light = DiffuseLight::new(Color::splat(4.0));
        let incoming = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::NEG_Z);
        let rec = record(&light, &incoming);
        let mut rng = StdRng::seed_from_u64(0);

        assert!(light.scatter(&incoming, &rec, &mut rng).is_none());
        assert_eq!(light.emitted(0.0, 0.0, Vec3::ZERO), Color::splat(4.0));
        assert_eq!(
            Lambertian::new(Color::ONE).emitted(0.0, 0.0, Vec3::ZERO),
            Color::ZERO
        );
    }
}
