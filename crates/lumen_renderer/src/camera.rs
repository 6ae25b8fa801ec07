//! Camera for ray generation.

use crate::error::{RenderError, RenderResult};
use crate::random::gen_f32;
use lumen_math::{Ray, Vec3};
use rand::RngCore;

/// Pinhole camera generating stratified rays into the scene.
///
/// Configure with the `with_*` builders, then call [`Camera::initialize`]
/// before asking for rays.
#[derive(Debug, Clone)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    u: Vec3,
    v: Vec3,
    w: Vec3,
    initialized: bool,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::new(0.0, 0.0, 0.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::new(0.0, 1.0, 0.0),
            vfov: 90.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            u: Vec3::X,
            v: Vec3::Y,
            w: Vec3::Z,
            initialized: false,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self.initialized = false;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self.initialized = false;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self.initialized = false;
        self
    }

    pub fn look_from(&self) -> Vec3 {
        self.look_from
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Validate the configuration and derive the viewport.
    ///
    /// The plane of pixel centres sits at the look-at point, so the focal
    /// length is the distance between look-from and look-at.
    pub fn initialize(&mut self) -> RenderResult<()> {
        if self.image_width == 0 || self.image_height == 0 {
            return Err(camera_error(format!(
                "resolution {}x{} has no pixels",
                self.image_width, self.image_height
            )));
        }
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(camera_error(format!(
                "vertical fov {} must lie in (0, 180) degrees",
                self.vfov
            )));
        }

        let view = self.look_from - self.look_at;
        let focal_length = view.length();
        if focal_length <= f32::EPSILON {
            return Err(camera_error(format!(
                "look_from and look_at coincide at {}",
                self.look_from
            )));
        }

        // Calculate camera basis vectors
        self.w = view / focal_length;
        let u = self.vup.cross(self.w);
        if u.length_squared() <= f32::EPSILON {
            return Err(camera_error(format!(
                "up vector {} is parallel to the view direction",
                self.vup
            )));
        }
        self.u = u.normalize();
        self.v = self.w.cross(self.u);
        self.center = self.look_from;

        // Calculate viewport dimensions
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h * focal_length;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        // Calculate viewport vectors
        let viewport_u = viewport_width * self.u;
        let viewport_v = -viewport_height * self.v;

        // Calculate pixel delta vectors
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;

        // Calculate upper left pixel location
        let viewport_upper_left =
            self.center - focal_length * self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);

        self.initialized = true;
        log::debug!(
            "Camera initialized: {}x{}, fov {}, from {} to {}",
            self.image_width,
            self.image_height,
            self.vfov,
            self.look_from,
            self.look_at
        );
        Ok(())
    }

    /// Ray through pixel (i, j), jittered inside stratum (row_s, col_s) of a
    /// `sqrt_spp` x `sqrt_spp` sub-pixel grid.
    pub fn get_ray(
        &self,
        i: u32,
        j: u32,
        row_s: u32,
        col_s: u32,
        sqrt_spp: u32,
        rng: &mut dyn RngCore,
    ) -> Ray {
        let offset = sample_square_stratified(row_s, col_s, sqrt_spp, rng);

        let pixel_sample = self.pixel00_loc
            + ((i as f32) + offset.x) * self.pixel_delta_u
            + ((j as f32) + offset.y) * self.pixel_delta_v;

        Ray::new(self.center, pixel_sample - self.center)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

fn camera_error(message: String) -> RenderError {
    log::error!("Camera: {}", message);
    RenderError::InvalidCamera(message)
}

/// Random point in stratum (row_s, col_s) of the square [-0.5, 0.5]^2.
fn sample_square_stratified(row_s: u32, col_s: u32, sqrt_spp: u32, rng: &mut dyn RngCore) -> Vec3 {
    let recip = 1.0 / sqrt_spp.max(1) as f32;
    let px = (col_s as f32 + gen_f32(rng)) * recip - 0.5;
    let py = (row_s as f32 + gen_f32(rng)) * recip - 0.5;
    Vec3::new(px, py, 0.0)
}
