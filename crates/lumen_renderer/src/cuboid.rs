//! Axis-aligned box assembled from six quads.

use std::sync::Arc;

use crate::{
    error::{RenderError, RenderResult},
    hittable::{HitRecord, Hittable},
    BvhNode, Material, Quad,
};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Per-face materials in the order front (+z), back (-z), left (-x),
/// right (+x), top (+y), bottom (-y).
pub type FaceMaterials = [Arc<dyn Material>; 6];

/// A closed box whose faces live in their own small BVH.
pub struct Cuboid {
    faces: BvhNode,
    bbox: Aabb,
}

impl Cuboid {
    /// Box spanning opposite corners `a` and `b` with a single material.
    pub fn new(a: Vec3, b: Vec3, material: Arc<dyn Material>) -> RenderResult<Self> {
        let faces = [(); 6].map(|_| material.clone());
        Self::with_face_materials(a, b, faces)
    }

    /// Box with a separate material for each face.
    pub fn with_face_materials(a: Vec3, b: Vec3, materials: FaceMaterials) -> RenderResult<Self> {
        let lo = a.min(b);
        let hi = a.max(b);
        let size = hi - lo;
        if size.min_element() <= f32::EPSILON {
            log::error!("Cuboid: zero extent between {} and {}", a, b);
            return Err(RenderError::InvalidGeometry(format!(
                "box between {} and {} has zero extent",
                a, b
            )));
        }

        let dx = Vec3::new(size.x, 0.0, 0.0);
        let dy = Vec3::new(0.0, size.y, 0.0);
        let dz = Vec3::new(0.0, 0.0, size.z);

        let [front, back, left, right, top, bottom] = materials;
        // Edge order makes every face normal point out of the box
        let quads: Vec<Arc<dyn Hittable>> = vec![
            Arc::new(Quad::new(Vec3::new(lo.x, lo.y, hi.z), dx, dy, front)),
            Arc::new(Quad::new(lo, dy, dx, back)),
            Arc::new(Quad::new(lo, dz, dy, left)),
            Arc::new(Quad::new(Vec3::new(hi.x, lo.y, lo.z), dy, dz, right)),
            Arc::new(Quad::new(Vec3::new(lo.x, hi.y, lo.z), dz, dx, top)),
            Arc::new(Quad::new(lo, dx, dz, bottom)),
        ];

        Ok(Self {
            faces: BvhNode::new(quads),
            bbox: Aabb::from_points(lo, hi),
        })
    }
}

impl Hittable for Cuboid {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        self.faces.hit(ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
