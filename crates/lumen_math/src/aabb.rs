use crate::{Interval, Ray, Vec3};

/// Minimum thickness of every axis so flat geometry still yields a usable slab.
const PADDING: f32 = 0.0001;

/// Axis-Aligned Bounding Box for spatial acceleration structures (BVH).
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// The empty box; merging anything into it yields that thing.
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    pub const UNIVERSE: Aabb = Aabb {
        x: Interval::UNIVERSE,
        y: Interval::UNIVERSE,
        z: Interval::UNIVERSE,
    };

    /// Create a new AABB from three intervals.
    pub fn new(x: Interval, y: Interval, z: Interval) -> Self {
        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB from two corner points (in any order).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self::new(
            Interval::new(a.x.min(b.x), a.x.max(b.x)),
            Interval::new(a.y.min(b.y), a.y.max(b.y)),
            Interval::new(a.z.min(b.z), a.z.max(b.z)),
        )
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn merge(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::merge(&box0.x, &box1.x),
            y: Interval::merge(&box0.y, &box1.y),
            z: Interval::merge(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method: each axis narrows the accepted range of t, and the test
    /// fails as soon as the range becomes empty. A zero direction component
    /// produces infinite slab bounds, which order correctly on their own.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        let origin = r.origin();
        let direction = r.direction();

        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / direction[axis];

            let mut t0 = (slab.min - origin[axis]) * adinv;
            let mut t1 = (slab.max - origin[axis]) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < PADDING {
            self.x = self.x.expand(PADDING);
        }
        if self.y.size() < PADDING {
            self.y = self.y.expand(PADDING);
        }
        if self.z.size() < PADDING {
            self.z = self.z.expand(PADDING);
        }
    }

    /// Grow every axis by `delta` (delta/2 on each side).
    pub fn expand(&self, delta: f32) -> Aabb {
        Aabb::new(self.x.expand(delta), self.y.expand(delta), self.z.expand(delta))
    }

    /// Translate (move) the AABB by an offset vector.
    pub fn translate(&self, offset: Vec3) -> Aabb {
        Aabb::new(
            self.x.displace(offset.x),
            self.y.displace(offset.y),
            self.z.displace(offset.z),
        )
    }

    /// Returns the index (0=X, 1=Y, 2=Z) of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let x_size = self.x.size();
        let y_size = self.y.size();
        let z_size = self.z.size();

        if x_size > y_size && x_size > z_size {
            0
        } else if y_size > z_size {
            1
        } else {
            2
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// The eight corner points of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min(), self.max());
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// True when `p` lies inside or on the boundary of the box.
    pub fn contains_point(&self, p: Vec3) -> bool {
        self.x.contains(p.x) && self.y.contains(p.y) && self.z.contains(p.z)
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_strategy::proptest;

    fn arb_point() -> impl Strategy<Value = Vec3> {
        (-100f32..100.0, -100f32..100.0, -100f32..100.0).prop_map(|(x, y, z)| Vec3::new(x, y, z))
    }

    fn arb_aabb() -> impl Strategy<Value = Aabb> {
        (arb_point(), arb_point()).prop_map(|(a, b)| Aabb::from_points(a, b))
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(Vec3::new(10.0, 0.0, 10.0), Vec3::new(0.0, 10.0, 0.0));

        assert_eq!(aabb.x, Interval::new(0.0, 10.0));
        assert_eq!(aabb.y, Interval::new(0.0, 10.0));
        assert_eq!(aabb.z, Interval::new(0.0, 10.0));
    }

    #[test]
    fn test_aabb_pads_flat_axis() {
        // A quad lying in the z = 0 plane still gets a thin slab
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0));

        assert!(aabb.z.size() >= PADDING * 0.999);
        assert!(aabb.z.contains(0.0));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));
    }

    #[test]
    fn test_aabb_merge() {
        let box1 = Aabb::from_points(Vec3::ZERO, Vec3::new(5.0, 5.0, 5.0));
        let box2 = Aabb::from_points(Vec3::new(3.0, 3.0, 3.0), Vec3::new(10.0, 10.0, 10.0));
        let merged = Aabb::merge(&box1, &box2);

        assert_eq!(merged.x, Interval::new(0.0, 10.0));
        assert_eq!(Aabb::merge(&Aabb::EMPTY, &box1), box1);
    }

    #[test]
    fn test_aabb_hit() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        // Ray pointing at center
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray pointing away
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Ray missing the box
        let ray = Ray::new(Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 100.0)));

        // Interval ends before the box
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, 3.0)));
    }

    #[test]
    fn test_aabb_hit_negative_and_oblique_directions() {
        let aabb = Aabb::from_points(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(-1.0, -1.0, -1.0));
        assert!(aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));

        let ray = Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(-1.0, 1.0, -1.0));
        assert!(!aabb.hit(&ray, Interval::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_aabb_centroid_and_longest_axis() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 10.0, 10.0));
        assert_eq!(aabb.centroid(), Vec3::new(5.0, 5.0, 5.0));

        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(10.0, 1.0, 1.0)).longest_axis(), 0);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 10.0, 1.0)).longest_axis(), 1);
        assert_eq!(Aabb::from_points(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)).longest_axis(), 2);
    }

    #[test]
    fn test_aabb_translate() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let translated = aabb.translate(Vec3::new(5.0, 0.0, 0.0));

        assert_eq!(translated.x, Interval::new(5.0, 6.0));
        assert_eq!(translated.y, Interval::new(0.0, 1.0));
    }

    #[proptest]
    fn merge_is_commutative(#[strategy(arb_aabb())] a: Aabb, #[strategy(arb_aabb())] b: Aabb) {
        prop_assert_eq!(Aabb::merge(&a, &b), Aabb::merge(&b, &a));
    }

    #[proptest]
    fn merge_is_associative(
        #[strategy(arb_aabb())] a: Aabb,
        #[strategy(arb_aabb())] b: Aabb,
        #[strategy(arb_aabb())] c: Aabb,
    ) {
        let left = Aabb::merge(&Aabb::merge(&a, &b), &c);
        let right = Aabb::merge(&a, &Aabb::merge(&b, &c));
        prop_assert_eq!(left, right);
    }

    #[proptest]
    fn merge_contains_both_boxes(#[strategy(arb_aabb())] a: Aabb, #[strategy(arb_aabb())] b: Aabb) {
        let merged = Aabb::merge(&a, &b);
        for corner in a.corners().into_iter().chain(b.corners()) {
            prop_assert!(merged.contains_point(corner));
        }
    }
}
