//! Lumen renderer - CPU Path Tracing
//!
//! A Monte Carlo path tracer for physically-based rendering.
//!
//! Scenes are graphs of [`Hittable`] objects sharing [`Material`]s and
//! [`Texture`]s through `Arc`. A [`Camera`] and [`RenderSettings`] drive
//! [`render`], which traces row bands in parallel and returns an 8-bit
//! [`ImageBuffer`].

mod error;
pub mod random;
mod hittable;
mod material;
mod texture;
mod perlin;
mod sphere;
mod quad;
mod triangle;
mod circle;
mod cylinder;
mod cuboid;
mod translate;
mod rotate;
mod constant_medium;
mod bvh;
mod camera;
mod renderer;
mod band;

pub use error::{RenderError, RenderResult};
pub use hittable::{HitRecord, Hittable, HittableList};
pub use material::{Color, Dielectric, DiffuseLight, Lambertian, Material, Metal, ScatterResult};
pub use texture::{CheckerTexture, DefaultChecker, ImageTexture, Texture};
pub use perlin::{Perlin, PerlinTexture};
pub use sphere::Sphere;
pub use quad::Quad;
pub use triangle::Triangle;
pub use circle::Circle;
pub use cylinder::Cylinder;
pub use cuboid::{Cuboid, FaceMaterials};
pub use translate::Translate;
pub use rotate::Rotate;
pub use constant_medium::ConstantMedium;
pub use bvh::BvhNode;
pub use camera::Camera;
pub use renderer::{
    color_to_rgb8, linear_to_gamma, render, render_pixel, trace, Background, RenderSettings,
    T_MIN,
};
pub use band::{partition_rows, render_band, row_rng, BandResult, RowBand};

pub use lumen_core::ImageBuffer;

/// Re-export Vec3 and common math types from lumen_math
pub use lumen_math::{Aabb, Interval, Ray, Vec3};
