//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree built by median split: each level sorts its objects by the
//! minimum of their boxes along the longest axis and halves the list. Leaves
//! hold one or two objects. Tree depth is at most ceil(log2 n), but the split
//! ignores spatial distribution, so clustered inputs can produce loose boxes.

use std::sync::Arc;

use crate::{HitRecord, Hittable, HittableList};
use lumen_math::{Aabb, Interval, Ray};
use rand::RngCore;

/// BVH node - a branch with two children, a leaf with one or two objects,
/// or the empty tree.
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node referencing its objects directly.
    Leaf {
        first: Arc<dyn Hittable>,
        second: Option<Arc<dyn Hittable>>,
        bbox: Aabb,
    },
    /// Built from no objects; never hit.
    Empty,
}

impl BvhNode {
    /// Create a BVH from a list of hittable objects.
    pub fn new(objects: Vec<Arc<dyn Hittable>>) -> Self {
        if objects.is_empty() {
            log::warn!("BVH built from an empty object list");
            return BvhNode::Empty;
        }

        let count = objects.len();
        let bvh = Self::build(objects);
        log::debug!("Built BVH over {} objects, depth {}", count, bvh.depth());
        bvh
    }

    /// Build a BVH over every object of a scene list.
    pub fn from_list(list: &HittableList) -> Self {
        Self::new(list.objects().to_vec())
    }

    /// Recursive BVH construction.
    fn build(mut objects: Vec<Arc<dyn Hittable>>) -> Self {
        let bbox = objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| Aabb::merge(&acc, &o.bounding_box()));

        if objects.len() <= 2 {
            let mut objects = objects.into_iter();
            return match objects.next() {
                Some(first) => BvhNode::Leaf {
                    first,
                    second: objects.next(),
                    bbox,
                },
                None => BvhNode::Empty,
            };
        }

        let axis = bbox.longest_axis();
        objects.sort_by(|a, b| {
            let a_min = a.bounding_box().axis_interval(axis).min;
            let b_min = b.bounding_box().axis_interval(axis).min;
            a_min.total_cmp(&b_min)
        });

        // Split at midpoint
        let mid = objects.len() / 2;
        let right_objects = objects.split_off(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(objects)),
            right: Box::new(Self::build(right_objects)),
            bbox,
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// Number of objects referenced by the leaves.
    pub fn object_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { second, .. } => 1 + usize::from(second.is_some()),
            BvhNode::Branch { left, right, .. } => left.object_count() + right.object_count(),
        }
    }
}

impl Hittable for BvhNode {
    fn hit<'a>(
        &'a self,
        ray: &Ray,
        ray_t: Interval,
        rng: &mut dyn RngCore,
    ) -> Option<HitRecord<'a>> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf {
                first,
                second,
                bbox,
            } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_first = first.hit(ray, ray_t, rng);
                let Some(second) = second else {
                    return hit_first;
                };

                let max = hit_first.as_ref().map_or(ray_t.max, |rec| rec.t);
                second
                    .hit(ray, Interval::new(ray_t.min, max), rng)
                    .or(hit_first)
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.hit(ray, ray_t, rng);

                // Only check right up to closest hit
                let right_max = hit_left.as_ref().map_or(ray_t.max, |rec| rec.t);
                right
                    .hit(ray, Interval::new(ray_t.min, right_max), rng)
                    .or(hit_left)
            }
        }
    }

    fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}
