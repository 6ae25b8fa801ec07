//! Flat disk primitive.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    quad::PARALLEL_EPSILON,
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A disk of `radius` around `center`, facing along `normal`.
pub struct Circle {
    center: Vec3,
    radius: f32,
    normal: Vec3,
    tangent: Vec3,
    bitangent: Vec3,
    d: f32,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Circle {
    pub fn new(center: Vec3, radius: f32, normal: Vec3, material: Arc<dyn Material>) -> Self {
        let normal = normal.normalize_or_zero();

        let mut tangent = normal.cross(Vec3::X);
        if tangent.length() < 1e-8 {
            tangent = normal.cross(Vec3::Y);
        }
        let tangent = tangent.normalize_or_zero();
        let bitangent = tangent.cross(normal);

        let e1 = radius * tangent;
        let e2 = radius * bitangent;
        let bbox = Aabb::merge(
            &Aabb::from_points(center - e1 - e2, center + e1 + e2),
            &Aabb::from_points(center - e1 + e2, center + e1 - e2),
        );

        Self {
            center,
            radius,
            normal,
            tangent,
            bitangent,
            d: normal.dot(center),
            material,
            bbox,
        }
    }
}

impl Hittable for Circle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        if self.radius <= 0.0 {
            return None;
        }

        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let dp = ray.at(t) - self.center;
        if dp.length_squared() > self.radius * self.radius {
            return None;
        }

        // Map [-r, r] on each in-plane axis to [0, 1]
        let u = (dp.dot(self.bitangent) / self.radius + 1.0) * 0.5;
        let v = (dp.dot(self.tangent) / self.radius + 1.0) * 0.5;

        Some(HitRecord::new(
            ray,
            t,
            self.normal,
            (u, v),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
