//! Sphere primitive for ray tracing.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A sphere primitive.
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Negative radii are treated as zero.
    pub fn new(center: Vec3, radius: f32, material: Arc<dyn Material>) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y
        // phi: angle around Y axis from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // A point has no surface to shade
        if self.radius <= 0.0 {
            return None;
        }

        let oc = self.center - ray.origin();
        let a = ray.direction().length_squared();
        let h = ray.direction().dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            Self::get_sphere_uv(outward_normal),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Lambertian;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn grey() -> Arc<dyn Material> {
        Arc::new(Lambertian::new(Vec3::new(0.5, 0.5, 0.5)))
    }

    #[test]
    fn test_sphere_hit_nearest_root() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
            .unwrap();

        assert!((rec.t - 4.0).abs() < 1e-5);
        assert!((rec.p - Vec3::Z).length() < 1e-5);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert!(rec.front_face);
    }

    #[test]
    fn test_sphere_hit_far_root_from_inside() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, grey());
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let mut rng = StdRng::seed_from_u64(0);

        let rec = sphere
            .hit(&ray, Interval::new(0.0001, f32::INFINITY), &mut rng)
            .unwrap();

        assert!((rec.t - 1.0).abs() < 1e-5);
        assert!(!rec.front_face);
        assert!((rec.normal - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, grey());
        let mut rng = StdRng::seed_from_u64(0);

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        assert!(sphere
            .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
            .is_none());

        // Both roots outside the interval
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        assert!(sphere.hit(&ray, Interval::new(0.001, 0.4), &mut rng).is_none());
    }

    #[test]
    fn test_sphere_without_radius_is_never_hit() {
        let mut rng = StdRng::seed_from_u64(0);
        let through_center = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        for radius in [0.0, -1.0] {
            let sphere = Sphere::new(Vec3::ZERO, radius, grey());
            assert!(sphere
                .hit(&through_center, Interval::new(0.0001, f32::INFINITY), &mut rng)
                .is_none());
        }
    }

    #[test]
    fn test_sphere_uv() {
        let (u, v) = Sphere::get_sphere_uv(Vec3::Y);
        assert!((v - 1.0).abs() < 1e-5);
        assert!((0.0..=1.0).contains(&u));

        let (u, v) = Sphere::get_sphere_uv(Vec3::NEG_X);
        assert!((u - 0.0).abs() < 1e-5 || (u - 1.0).abs() < 1e-5);
        assert!((v - 0.5).abs() < 1e-5);
    }
}
