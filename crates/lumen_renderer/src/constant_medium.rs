//! Homogeneous participating medium (smoke, fog) bounded by a closed surface.

use std::sync::Arc;

use crate::random::gen_f32;
use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// Offset past the entry crossing when searching for the exit crossing.
const EXIT_SEARCH_OFFSET: f32 = 0.001;

/// A volume that scatters at exponentially distributed distances.
///
/// The boundary must be a closed shape; a ray that enters it is expected to
/// leave it again.
pub struct ConstantMedium {
    boundary: Arc<dyn Hittable>,
    neg_inv_density: f32,
    material: Arc<dyn Material>,
}

impl ConstantMedium {
    pub fn new(boundary: Arc<dyn Hittable>, density: f32, material: Arc<dyn Material>) -> Self {
        Self {
            boundary,
            neg_inv_density: -1.0 / density,
            material,
        }
    }
}

impl Hittable for ConstantMedium {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Both boundary crossings along the whole line
        let entry = self.boundary.hit(ray, Interval::UNIVERSE, rng)?;
        let exit = self.boundary.hit(
            ray,
            Interval::new(entry.t + EXIT_SEARCH_OFFSET, f32::INFINITY),
            rng,
        )?;

        let mut t_enter = entry.t.max(ray_t.min);
        let t_exit = exit.t.min(ray_t.max);
        if t_enter >= t_exit {
            return None;
        }
        t_enter = t_enter.max(0.0);

        let ray_length = ray.direction().length();
        let distance_inside_boundary = (t_exit - t_enter) * ray_length;
        let hit_distance = self.neg_inv_density * gen_f32(rng).ln();
        if hit_distance > distance_inside_boundary {
            return None;
        }

        let t = t_enter + hit_distance / ray_length;
        Some(HitRecord {
            p: ray.at(t),
            normal: exit.normal,
            material: self.material.as_ref(),
            u: exit.u,
            v: exit.v,
            t,
            front_face: true,
        })
    }

    fn bounding_box(&self) -> Aabb {
        self.boundary.bounding_box()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Lambertian, Sphere};
    use lumen_math::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fog(density: f32) -> ConstantMedium {
        let white: Arc<dyn Material> = Arc::new(Lambertian::new(Vec3::ONE));
        let boundary = Arc::new(Sphere::new(Vec3::ZERO, 1.0, white.clone()));
        ConstantMedium::new(boundary, density, white)
    }

    #[test]
    fn test_dense_medium_hits_inside_boundary() {
        let medium = fog(1000.0);
        let mut rng = StdRng::seed_from_u64(8);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        for _ in 0..50 {
            let rec = medium
                .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
                .unwrap();
            assert!(rec.t >= 4.0 && rec.t <= 6.0);
            assert!(rec.front_face);
            assert!(rec.p.length() <= 1.0 + 1e-4);
        }
    }

    #[test]
    fn test_thin_medium_mostly_passes_through() {
        let medium = fog(0.001);
        let mut rng = StdRng::seed_from_u64(8);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        let hits = (0..1000)
            .filter(|_| {
                medium
                    .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
                    .is_some()
            })
            .count();
        // Expected fraction is 1 - exp(-0.002), about 0.2%
        assert!(hits < 20, "{} hits", hits);
    }

    #[test]
    fn test_medium_misses_outside_boundary() {
        let medium = fog(1000.0);
        let mut rng = StdRng::seed_from_u64(8);

        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(medium
            .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
            .is_none());

        // Interval ends before the boundary
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(medium.hit(&ray, Interval::new(0.0001, 3.0), &mut rng).is_none());
    }

    #[test]
    fn test_ray_starting_inside_medium() {
        let medium = fog(1000.0);
        let mut rng = StdRng::seed_from_u64(2);
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let rec = medium
            .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
            .unwrap();
        assert!(rec.t > 0.0 && rec.t < 1.0);
    }
}
