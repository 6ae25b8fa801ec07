//! Finite capped cylinder.

use std::f32::consts::PI;
use std::sync::Arc;

use crate::{
    hittable::{closest_hit, HitRecord, Hittable},
    Circle, Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A cylinder standing on `bottom` and extending `height` along `axis`,
/// closed by two disks.
pub struct Cylinder {
    bottom: Vec3,
    axis: Vec3,
    height: f32,
    radius: f32,
    caps: [Arc<dyn Hittable>; 2],
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Cylinder {
    pub fn new(
        bottom: Vec3,
        axis: Vec3,
        height: f32,
        radius: f32,
        material: Arc<dyn Material>,
    ) -> Self {
        let axis = axis.normalize_or_zero();
        let top = bottom + height * axis;

        let caps: [Arc<dyn Hittable>; 2] = [
            Arc::new(Circle::new(bottom, radius, -axis, material.clone())),
            Arc::new(Circle::new(top, radius, axis, material.clone())),
        ];

        Self {
            bottom,
            axis,
            height,
            radius,
            caps,
            material,
            bbox: Aabb::from_points(bottom, top).expand(2.0 * radius),
        }
    }

    /// Intersection with the curved side only.
    fn hit_side<'a>(&'a self, ray: &Ray, ray_t: Interval) -> Option<HitRecord<'a>> {
        // A line segment has no side to shade
        if self.radius <= 0.0 {
            return None;
        }

        // Distance from the axis is |(p - bottom) x axis|
        let e = (ray.origin() - self.bottom).cross(self.axis);
        let f = ray.direction().cross(self.axis);
        let a = f.length_squared();
        if a < 1e-12 {
            // Ray runs along the axis and can only meet the caps
            return None;
        }

        let half_b = e.dot(f);
        let c = e.length_squared() - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();
        let mut root = (-half_b - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (-half_b + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let inner = ray.at(root) - self.bottom;
        let height = inner.dot(self.axis);
        if !(0.0..=self.height).contains(&height) {
            return None;
        }

        let outward_normal = (inner - height * self.axis) / self.radius;
        let u = (outward_normal.z.atan2(outward_normal.x) + PI) / (2.0 * PI);
        let v = height / self.height;

        Some(HitRecord::new(
            ray,
            root,
            outward_normal,
            (u, v),
            self.material.as_ref(),
        ))
    }
}

impl Hittable for Cylinder {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let cap = closest_hit(&self.caps, ray, ray_t, rng);
        let max = cap.as_ref().map_or(ray_t.max, |rec| rec.t);

        self.hit_side(ray, Interval::new(ray_t.min, max)).or(cap)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
