//! Quadrilateral (parallelogram) primitive.
//!
//! A quad is anchored at corner `Q` and spanned by edge vectors `u` and `v`.
//! The ray is intersected with the containing plane, then the hit point is
//! expressed in the (u, v) basis; the triangle primitive reuses this frame.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Rays with |n·d| below this are treated as parallel to a plane.
pub(crate) const PARALLEL_EPSILON: f32 = 1e-8;

/// Plane through `q` spanned by `u` and `v`, with precomputed reciprocal normal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PlaneFrame {
    q: Vec3,
    u: Vec3,
    v: Vec3,
    normal: Vec3,
    d: f32,
    w: Vec3,
}

impl PlaneFrame {
    pub(crate) fn new(q: Vec3, u: Vec3, v: Vec3) -> Self {
        let n = u.cross(v);
        let normal = n.normalize_or_zero();
        let n_len_sq = n.length_squared();

        Self {
            q,
            u,
            v,
            normal,
            d: normal.dot(q),
            w: if n_len_sq > 0.0 { n / n_len_sq } else { Vec3::ZERO },
        }
    }

    /// Bounding box of the parallelogram (both diagonals).
    pub(crate) fn bounding_box(&self) -> Aabb {
        let diagonal1 = Aabb::from_points(self.q, self.q + self.u + self.v);
        let diagonal2 = Aabb::from_points(self.q + self.u, self.q + self.v);
        Aabb::merge(&diagonal1, &diagonal2)
    }

    /// Plane hit as `(t, alpha, beta)`, before any shape test.
    pub(crate) fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<(f32, f32, f32)> {
        let denom = self.normal.dot(ray.direction());
        if denom.abs() < PARALLEL_EPSILON {
            return None;
        }

        let t = (self.d - self.normal.dot(ray.origin())) / denom;
        if !ray_t.surrounds(t) {
            return None;
        }

        let dp = ray.at(t) - self.q;
        let alpha = self.w.dot(dp.cross(self.v));
        let beta = self.w.dot(self.u.cross(dp));
        Some((t, alpha, beta))
    }

    pub(crate) fn normal(&self) -> Vec3 {
        self.normal
    }
}

/// A flat parallelogram.
pub struct Quad {
    frame: PlaneFrame,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Quad {
    /// Create a quad with corner `q` and edges `u`, `v`.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let frame = PlaneFrame::new(q, u, v);
        Self {
            bbox: frame.bounding_box(),
            frame,
            material,
        }
    }
}

impl Hittable for Quad {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (t, alpha, beta) = self.frame.intersect(ray, ray_t)?;

        let unit = Interval::new(0.0, 1.0);
        if !unit.contains(alpha) || !unit.contains(beta) {
            return None;
        }

        Some(HitRecord::new(
            ray,
            t,
            self.frame.normal(),
            (alpha, beta),
            self.material.as_ref(),
        ))
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
