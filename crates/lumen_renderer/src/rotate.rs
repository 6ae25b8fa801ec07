//! Rotation decorator about an arbitrary axis.

use std::sync::Arc;

use crate::{HitRecord, Hittable, Material};
use lumen_math::{Aabb, Interval, Mat3, Mat3Ext, Ray, Vec3};
use rand::RngCore;

/// Rotates a shared object about an axis through the origin.
pub struct Rotate {
    object: Arc<dyn Hittable>,
    rotation: Mat3,
    inverse: Mat3,
    material: Option<Arc<dyn Material>>,
    bbox: Aabb,
}

impl Rotate {
    /// Rotate `object` by `radians` about `axis` (right-handed).
    pub fn new(object: Arc<dyn Hittable>, axis: Vec3, radians: f32) -> Self {
        let rotation = Mat3::rotation(axis, radians);
        let bbox = rotation.transform_aabb(&object.bounding_box());

        Self {
            object,
            rotation,
            // Orthonormal, so the transpose is the inverse
            inverse: rotation.transpose(),
            material: None,
            bbox,
        }
    }

    /// Shorthand for a rotation about +Y given in degrees.
    pub fn y_degrees(object: Arc<dyn Hittable>, degrees: f32) -> Self {
        Self::new(object, Vec3::Y, degrees.to_radians())
    }

    /// Replace the material reported for every hit on the wrapped object.
    pub fn with_material(mut self, material: Arc<dyn Material>) -> Self {
        self.material = Some(material);
        self
    }
}

impl Hittable for Rotate {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        // Ray into object space; t is unchanged by a rotation
        let local = self.inverse.transform_ray(ray);
        let mut rec = self.object.hit(&local, ray_t, rng)?;

        rec.p = self.rotation * rec.p;
        rec.normal = self.rotation * rec.normal;
        if let Some(material) = &self.material {
            rec.material = material.as_ref();
        }
        Some(rec)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
