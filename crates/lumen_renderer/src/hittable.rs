//! Hittable trait and HitRecord for ray-object intersection.

use std::sync::Arc;

use crate::Material;
use lumen_math::{Aabb, Interval, Ray, Vec3};
use rand::RngCore;

/// Record of a ray-object intersection.
#[derive(Clone)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Surface normal at intersection (always points against ray)
    pub normal: Vec3,
    /// Material at the intersection point
    pub material: &'a dyn Material,
    /// UV texture coordinates
    pub u: f32,
    pub v: f32,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> HitRecord<'a> {
    /// Build a record for a hit at `t`, orienting `outward_normal` against the ray.
    pub fn new(
        ray: &Ray,
        t: f32,
        outward_normal: Vec3,
        (u, v): (f32, f32),
        material: &'a dyn Material,
    ) -> Self {
        let mut rec = Self {
            p: ray.at(t),
            normal: outward_normal,
            material,
            u,
            v,
            t,
            front_face: true,
        };
        rec.set_face_normal(ray, outward_normal);
        rec
    }

    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        // If the ray and normal point in the same direction, we're inside
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        // Normal always points against the ray
        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Trait for objects that can be hit by rays.
pub trait Hittable: Send + Sync {
    /// Find the closest intersection with `t` strictly inside `ray_t`.
    ///
    /// `rng` is only consumed by probabilistic surfaces (participating media).
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rng: &mut dyn RngCore)
        -> Option<HitRecord<'a>>;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}

/// Find the closest hit among `objects`, narrowing the interval after each hit.
pub(crate) fn closest_hit<'a>(
    objects: &'a [Arc<dyn Hittable>],
    ray: &Ray,
    ray_t: Interval,
    rng: &mut dyn RngCore,
) -> Option<HitRecord<'a>> {
    let mut closest: Option<HitRecord<'a>> = None;

    for object in objects {
        let max = closest.as_ref().map_or(ray_t.max, |rec| rec.t);
        if let Some(rec) = object.hit(ray, Interval::new(ray_t.min, max), rng) {
            closest = Some(rec);
        }
    }

    closest
}

/// An ordered list of hittable objects, searched linearly.
#[derive(Clone)]
pub struct HittableList {
    objects: Vec<Arc<dyn Hittable>>,
    bbox: Aabb,
}

impl HittableList {
    /// Create a new empty hittable list.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    /// Add an object to the list.
    pub fn add(&mut self, object: Arc<dyn Hittable>) {
        self.bbox = Aabb::merge(&self.bbox, &object.bounding_box());
        self.objects.push(object);
    }

    /// The objects in insertion order.
    pub fn objects(&self) -> &[Arc<dyn Hittable>] {
        &self.objects
    }

    /// Clear all objects from the list.
    pub fn clear(&mut self) {
        self.objects.clear();
        self.bbox = Aabb::EMPTY;
    }

    /// Get the number of objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl Default for HittableList {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Arc<dyn Hittable>> for HittableList {
    fn from_iter<I: IntoIterator<Item = Arc<dyn Hittable>>>(iter: I) -> Self {
        let mut list = Self::new();
        for object in iter {
            list.add(object);
        }
        list
    }
}

impl Hittable for HittableList {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        closest_hit(&self.objects, ray, ray_t, rng)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
