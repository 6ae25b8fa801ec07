//! Core path tracing renderer.
//!
//! Implements Monte Carlo path tracing with:
//! - Recursive ray tracing with configurable depth
//! - Stratified anti-aliasing
//! - Gamma correction
//! - Row bands rendered in parallel on a rayon pool

use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::band::{partition_rows, render_band, BandResult};
use crate::error::{RenderError, RenderResult};
use crate::{Camera, Color, Hittable};
use lumen_core::ImageBuffer;
use lumen_math::{Interval, Ray};

/// Closest accepted ray parameter; keeps bounced rays off their own surface.
pub const T_MIN: f32 = 0.0001;

/// Color seen by rays that leave the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Background {
    /// Same color in every direction
    Solid(Color),
    /// Blend from `bottom` (looking down) to `top` (looking up)
    Gradient { bottom: Color, top: Color },
}

impl Background {
    pub fn black() -> Self {
        Background::Solid(Color::ZERO)
    }

    pub fn white() -> Self {
        Background::Solid(Color::ONE)
    }

    /// White at the horizon below, blue overhead.
    pub fn sky() -> Self {
        Background::Gradient {
            bottom: Color::ONE,
            top: Color::new(0.2, 0.5, 1.0),
        }
    }

    /// Evaluate the background for an escaping ray.
    pub fn color(&self, ray: &Ray) -> Color {
        match *self {
            Background::Solid(color) => color,
            Background::Gradient { bottom, top } => {
                let unit_direction = ray.direction().normalize_or_zero();
                let a = 0.5 * (unit_direction.y + 1.0);
                bottom * (1.0 - a) + top * a
            }
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::sky()
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Samples per pixel, rounded down to a square number of strata
    pub samples_per_pixel: u32,
    /// Maximum ray bounce depth
    pub max_depth: u32,
    pub background: Background,
    /// Master seed for every per-row generator
    pub seed: u64,
    /// Worker count; `None` uses the detected processor count
    pub workers: Option<usize>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 100,
            max_depth: 50,
            background: Background::default(),
            seed: 0,
            workers: None,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> RenderResult<()> {
        if self.samples_per_pixel == 0 {
            return Err(settings_error("samples_per_pixel must be at least 1"));
        }
        if self.workers == Some(0) {
            return Err(settings_error("workers must be at least 1"));
        }
        Ok(())
    }

    /// Side length of the stratified sub-pixel grid.
    pub fn sqrt_spp(&self) -> u32 {
        ((self.samples_per_pixel as f64).sqrt().floor() as u32).max(1)
    }

    /// Worker count after falling back to the detected parallelism.
    pub fn resolved_workers(&self) -> usize {
        self.workers.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

fn settings_error(message: &str) -> RenderError {
    log::error!("Render settings: {}", message);
    RenderError::InvalidSettings(message.to_string())
}

/// Compute the color seen by a ray.
///
/// This is the core path tracing function. It traces the ray through
/// the scene, bouncing off surfaces and accumulating color.
pub fn trace(
    ray: &Ray,
    world: &dyn Hittable,
    depth: u32,
    background: &Background,
    rng: &mut dyn RngCore,
) -> Color {
    // Out of bounces, no more light is gathered
    if depth == 0 {
        return Color::ZERO;
    }

    let Some(rec) = world.hit(ray, Interval::new(T_MIN, f32::INFINITY), rng) else {
        return background.color(ray);
    };

    let emission = rec.material.emitted(rec.u, rec.v, rec.p);

    match rec.material.scatter(ray, &rec, rng) {
        Some(result) => {
            let scattered_color = trace(&result.scattered, world, depth - 1, background, rng);
            emission + result.attenuation * scattered_color
        }
        // Absorbed
        None => emission,
    }
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to 8-bit RGB.
pub fn color_to_rgb8(color: Color) -> [u8; 3] {
    let channel = |c: f32| (256.0 * linear_to_gamma(c).clamp(0.0, 0.999)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Average of the stratified samples for pixel (x, y), in linear color.
pub fn render_pixel(
    camera: &Camera,
    world: &dyn Hittable,
    x: u32,
    y: u32,
    settings: &RenderSettings,
    rng: &mut dyn RngCore,
) -> Color {
    let sqrt_spp = settings.sqrt_spp();
    let mut pixel_color = Color::ZERO;

    for row_s in 0..sqrt_spp {
        for col_s in 0..sqrt_spp {
            let ray = camera.get_ray(x, y, row_s, col_s, sqrt_spp, rng);
            pixel_color += trace(&ray, world, settings.max_depth, &settings.background, rng);
        }
    }

    pixel_color / (sqrt_spp * sqrt_spp) as f32
}

/// Render the entire scene to an image buffer.
///
/// Rows are split into one band per worker and the bands are traced on a
/// dedicated rayon pool of that size.
pub fn render(
    camera: &Camera,
    world: &dyn Hittable,
    settings: &RenderSettings,
) -> RenderResult<ImageBuffer> {
    settings.validate()?;
    if !camera.is_initialized() {
        log::error!("Render requested with an uninitialized camera");
        return Err(RenderError::InvalidCamera(
            "camera must be initialized before rendering".to_string(),
        ));
    }

    let width = camera.image_width;
    let height = camera.image_height;
    let bands = partition_rows(height, settings.resolved_workers());

    log::info!(
        "Rendering {}x{}, {} samples/pixel, depth {}, {} workers",
        width,
        height,
        settings.sqrt_spp() * settings.sqrt_spp(),
        settings.max_depth,
        bands.len()
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(bands.len())
        .build()?;

    // Ordered collect keeps bands top to bottom
    let results: Vec<BandResult> = pool.install(|| {
        bands
            .par_iter()
            .map(|band| render_band(band, camera, world, settings))
            .collect()
    });

    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for result in results {
        pixels.extend(result.pixels);
    }

    ImageBuffer::from_pixels(width, height, pixels).map_err(|e| {
        log::error!("Joined bands do not fill the image: {}", e);
        RenderError::InvalidSettings(e.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BvhNode, DiffuseLight, Lambertian, Material, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn grey_sphere() -> BvhNode {
        let material: Arc<dyn Material> = Arc::new(Lambertian::new(Color::new(0.5, 0.5, 0.5)));
        BvhNode::new(vec![Arc::new(Sphere::new(Vec3::ZERO, 1.0, material))])
    }

    fn camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new()
            .with_resolution(width, height)
            .with_position(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y)
            .with_fov(40.0);
        camera.initialize().unwrap();
        camera
    }

    #[test]
    fn test_sky_gradient() {
        let sky = Background::sky();

        // Looking straight up gives the top color, straight down the bottom
        let up_ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 0.0));
        assert!((sky.color(&up_ray) - Color::new(0.2, 0.5, 1.0)).length() < 1e-6);

        let down_ray = Ray::new(Vec3::ZERO, Vec3::NEG_Y);
        assert!((sky.color(&down_ray) - Color::ONE).length() < 1e-6);

        let level = Ray::new(Vec3::ZERO, Vec3::X);
        assert!((sky.color(&level) - Color::new(0.6, 0.75, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_trace_zero_depth_is_black() {
        let world = grey_sphere();
        let mut rng = StdRng::seed_from_u64(1);

        for dir in [Vec3::NEG_Z, Vec3::X, Vec3::Y] {
            let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), dir);
            assert_eq!(trace(&ray, &world, 0, &Background::white(), &mut rng), Color::ZERO);
        }
    }

    #[test]
    fn test_trace_escaping_ray_sees_background() {
        let world = grey_sphere();
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);

        let background = Background::Solid(Color::new(0.1, 0.2, 0.3));
        assert_eq!(trace(&ray, &world, 5, &background, &mut rng), Color::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_trace_light_is_emission_only() {
        let light: Arc<dyn Material> = Arc::new(DiffuseLight::new(Color::splat(4.0)));
        let world = BvhNode::new(vec![Arc::new(Sphere::new(Vec3::ZERO, 1.0, light))]);
        let mut rng = StdRng::seed_from_u64(1);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);

        assert_eq!(
            trace(&ray, &world, 1, &Background::white(), &mut rng),
            Color::splat(4.0)
        );
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 0.0001);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgb8() {
        assert_eq!(color_to_rgb8(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb8(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::splat(20.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb8(Color::new(0.25, -3.0, f32::NAN)), [128, 0, 0]);
    }

    #[test]
    fn test_sqrt_spp() {
        let mut settings = RenderSettings::default();
        assert_eq!(settings.sqrt_spp(), 10);
        settings.samples_per_pixel = 15;
        assert_eq!(settings.sqrt_spp(), 3);
        settings.samples_per_pixel = 1;
        assert_eq!(settings.sqrt_spp(), 1);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = RenderSettings::default();
        assert!(settings.validate().is_ok());

        settings.samples_per_pixel = 0;
        assert!(matches!(settings.validate(), Err(RenderError::InvalidSettings(_))));

        settings.samples_per_pixel = 4;
        settings.workers = Some(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_json_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "samples_per_pixel": 16, "background": { "solid": [1.0, 1.0, 1.0] } }"#)
                .unwrap();
        assert_eq!(settings.samples_per_pixel, 16);
        assert_eq!(settings.max_depth, 50);
        assert_eq!(settings.background, Background::white());
        assert_eq!(settings.workers, None);

        let json = serde_json::to_string(&RenderSettings::default()).unwrap();
        let back: RenderSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RenderSettings::default());
    }

    #[test]
    fn test_render_pixel() {
        let world = grey_sphere();
        let camera = camera(11, 11);
        let settings = RenderSettings {
            samples_per_pixel: 4,
            max_depth: 5,
            background: Background::white(),
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(42);

        // Centre pixel hits the sphere and comes out darker than the background
        let color = render_pixel(&camera, &world, 5, 5, &settings, &mut rng);
        assert!(color.x < 1.0);
        assert!(color.length() > 0.0);

        // Corner pixel misses
        let corner = render_pixel(&camera, &world, 0, 0, &settings, &mut rng);
        assert_eq!(corner, Color::ONE);
    }

    #[test]
    fn test_render_with_huge_worker_count() {
        let world = grey_sphere();
        let camera = camera(4, 3);
        let settings = RenderSettings {
            samples_per_pixel: 1,
            max_depth: 2,
            workers: Some((u32::MAX as usize).saturating_add(1)),
            ..Default::default()
        };

        assert!(settings.validate().is_ok());
        let image = render(&camera, &world, &settings).unwrap();
        assert_eq!(image.pixels.len(), 12);
    }

    #[test]
    fn test_render_requires_initialized_camera() {
        let world = grey_sphere();
        let camera = Camera::new().with_resolution(4, 4);
        let result = render(&camera, &world, &RenderSettings::default());
        assert!(matches!(result, Err(RenderError::InvalidCamera(_))));
    }

    #[test]
    fn test_render_dimensions() {
        let world = grey_sphere();
        let camera = camera(8, 5);
        let settings = RenderSettings {
            samples_per_pixel: 1,
            max_depth: 3,
            workers: Some(3),
            ..Default::default()
        };

        let image = render(&camera, &world, &settings).unwrap();
        assert_eq!(image.width, 8);
        assert_eq!(image.height, 5);
        assert_eq!(image.pixels.len(), 40);
    }
}
