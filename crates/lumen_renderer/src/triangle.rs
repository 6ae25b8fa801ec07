//! Triangle primitive for ray tracing.
//!
//! Shares the plane/(alpha, beta) frame with [`crate::Quad`]; a hit is kept when
//! alpha and beta are non-negative and sum to at most one.

use std::sync::Arc;

use crate::{
    hittable::{HitRecord, Hittable},
    quad::PlaneFrame,
    Material,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// A triangle with corner `q` and edges `u`, `v`.
pub struct Triangle {
    frame: PlaneFrame,
    material: Arc<dyn Material>,
    bbox: Aabb,
}

impl Triangle {
    /// Create a triangle from a corner and two edge vectors.
    pub fn new(q: Vec3, u: Vec3, v: Vec3, material: Arc<dyn Material>) -> Self {
        let frame = PlaneFrame::new(q, u, v);
        Self {
            bbox: frame.bounding_box(),
            frame,
            material,
        }
    }

    /// Create a triangle from three vertices.
    pub fn from_vertices(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<dyn Material>) -> Self {
        Self::new(v0, v1 - v0, v2 - v0, material)
    }
}

impl Hittable for Triangle {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        _rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        let (t, alpha, beta) = self.frame.intersect(ray, ray_t)?;

        if alpha < 0.0 || beta < 0.0 || alpha + beta > 1.0 {
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
