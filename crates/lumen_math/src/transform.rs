// Rotation utilities for Mat3
//
// Extends glam::Mat3 with the helpers the rotate decorator needs.
// Note: glam::Mat3 already provides from_axis_angle(), transpose() and mul_vec3()

use crate::{Aabb, Ray};
use glam::{Mat3, Vec3};

/// Extension trait for Mat3 to provide ray and bounding box transforms.
pub trait Mat3Ext {
    /// Rotation by `radians` around an arbitrary (not necessarily unit) axis.
    fn rotation(axis: Vec3, radians: f32) -> Mat3;

    /// Transform both the origin and the direction of a ray.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat3Ext for Mat3 {
    fn rotation(axis: Vec3, radians: f32) -> Mat3 {
        Mat3::from_axis_angle(axis.normalize(), radians)
    }

    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::new(*self * ray.origin(), *self * ray.direction())
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let corners = aabb.corners();
        let first = *self * corners[0];

        let (result_min, result_max) = corners[1..]
            .iter()
            .map(|&corner| *self * corner)
            .fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

        Aabb::from_points(result_min, result_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_rotation_quarter_turn_about_z() {
        let mat = Mat3::rotation(Vec3::new(0.0, 0.0, 2.0), PI / 2.0);
        let transformed = mat * Vec3::X;

        // X vector should rotate to Y vector
        assert!((transformed - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_rotation_inverse_is_transpose() {
        let mat = Mat3::rotation(Vec3::new(1.0, 1.0, 0.0), PI / 5.0);
        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = mat.transpose() * (mat * point);

        assert!((back - point).length() < 0.001);
    }

    #[test]
    fn test_transform_ray() {
        let mat = Mat3::rotation(Vec3::Y, PI);
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        let rotated = mat.transform_ray(&ray);

        assert!((rotated.origin() - Vec3::new(-1.0, 2.0, -3.0)).length() < 0.001);
        assert!((rotated.direction() - Vec3::NEG_Z).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_identity() {
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = Mat3::IDENTITY.transform_aabb(&aabb);

        assert!((transformed.min() - aabb.min()).length() < 0.001);
        assert!((transformed.max() - aabb.max()).length() < 0.001);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        // A unit cube turned 45 degrees about Y spans sqrt(2) along X and Z
        let aabb = Aabb::from_points(Vec3::splat(-0.5), Vec3::splat(0.5));
        let transformed = Mat3::rotation(Vec3::Y, PI / 4.0).transform_aabb(&aabb);

        let half_diagonal = 0.5 * 2f32.sqrt();
        assert!((transformed.x.max - half_diagonal).abs() < 0.001);
        assert!((transformed.z.min + half_diagonal).abs() < 0.001);
        assert!((transformed.y.max - 0.5).abs() < 0.001);
    }
}
