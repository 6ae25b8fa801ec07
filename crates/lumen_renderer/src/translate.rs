//! Translation decorator.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Moves a shared object by `offset`, optionally swapping its material.
pub struct Translate {
    object: Arc<dyn Hittable>,
    offset: Vec3,
    material: Option<Arc<dyn Material>>,
    bbox: Aabb,
}

impl Translate {
    pub fn new(object: Arc<dyn Hittable>, offset: Vec3) -> Self {
        let bbox = object.bounding_box().translate(offset);
        Self {
            object,
            offset,
            material: None,
            bbox,
        }
    }

    /// Replace the material reported for every hit on the wrapped object.
    pub fn with_material(mut self, material: Arc<dyn Material>) -> Self {
        self.material = Some(material);
        self
    }
}

impl Hittable for Translate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Move the ray into object space
        let local = Ray::new(ray.origin() - self.offset, ray.direction());
        let mut rec = self.object.hit(&local, ray_t, rng)?;

        rec.p += self.offset;
        if let Some(material) = &self.material {
            rec.material = material.as_ref();
        }
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
