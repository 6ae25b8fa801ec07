//! Decoded texture images.
//!
//! Images are loaded from disk with the `image` crate and stored as linear
//! RGB floats so the renderer can filter them without further conversion.

use std::path::Path;

use lumen_math::Vec3;

use crate::{ImageError, ImageResult};

/// A decoded image in linear RGB float format.
#[derive(Clone, Debug)]
pub struct TextureImage {
    /// Texture width in pixels
    pub width: u32,

    /// Texture height in pixels
    pub height: u32,

    /// Pixel data (linear, 0-1 range), row-major with row 0 at the top
    pub pixels: Vec<[f32; 3]>,

    /// Original file path (for debugging)
    pub path: String,
}

impl TextureImage {
    /// Create a texture from linear pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[f32; 3]>) -> ImageResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::DimensionMismatch {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            path: "<memory>".to_string(),
        })
    }

    /// Load and decode an image file, converting sRGB bytes to linear floats.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let pixels = rgb
            .pixels()
            .map(|p| [srgb_to_linear(p[0]), srgb_to_linear(p[1]), srgb_to_linear(p[2])])
            .collect();

        log::debug!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(Self {
            width,
            height,
            pixels,
            path: path.to_string_lossy().to_string(),
        })
    }

    /// Get the pixel at (x, y), clamped to the image bounds.
    pub fn get_pixel(&self, x: u32, y: u32) -> [f32; 3] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        self.pixels
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or([0.0; 3])
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// UV coordinates are clamped to [0, 1], with v = 0 on the bottom row.
    pub fn sample(&self, u: f32, v: f32) -> Vec3 {
        if self.pixels.is_empty() {
            return Vec3::ZERO;
        }

        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        // Flip V for image coordinates
        let x = u * (self.width - 1) as f32;
        let y = (1.0 - v) * (self.height - 1) as f32;

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let p00 = Vec3::from(self.get_pixel(x0, y0));
        let p10 = Vec3::from(self.get_pixel(x0 + 1, y0));
        let p01 = Vec3::from(self.get_pixel(x0, y0 + 1));
        let p11 = Vec3::from(self.get_pixel(x0 + 1, y0 + 1));

        let top = p00.lerp(p10, fx);
        let bottom = p01.lerp(p11, fx);
        top.lerp(bottom, fy)
    }
}

/// Convert sRGB byte value to linear float.
fn srgb_to_linear(value: u8) -> f32 {
    let v = value as f32 / 255.0;
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> TextureImage {
        // Top row: red, green. Bottom row: blue, white.
        TextureImage::from_pixels(
            2,
            2,
            vec![
                [1.0, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0, 1.0],
                [1.0, 1.0, 1.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_sample_corners() {
        let tex = two_by_two();

        // v = 0 is the bottom row
        assert!((tex.sample(0.0, 0.0) - Vec3::Z).length() < 0.001);
        assert!((tex.sample(1.0, 0.0) - Vec3::ONE).length() < 0.001);
        assert!((tex.sample(0.0, 1.0) - Vec3::X).length() < 0.001);
        assert!((tex.sample(1.0, 1.0) - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_sample_bilinear_center_and_clamp() {
        let tex = two_by_two();

        let center = tex.sample(0.5, 0.5);
        assert!((center - Vec3::new(0.5, 0.5, 0.5)).length() < 0.001);

        // Out-of-range coordinates clamp to the edge
        assert_eq!(tex.sample(-3.0, 7.0), tex.sample(0.0, 1.0));
    }

    #[test]
    fn test_from_pixels_rejects_wrong_length() {
        let result = TextureImage::from_pixels(3, 3, vec![[0.0; 3]; 4]);
        assert!(matches!(
            result,
            Err(ImageError::DimensionMismatch { expected: 9, actual: 4 })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let result = TextureImage::load("definitely/not/here.png");
        assert!(result.is_err());
    }

    #[test]
    fn test_srgb_to_linear() {
        // Black stays black
        assert!((srgb_to_linear(0) - 0.0).abs() < 0.001);

        // White stays white
        assert!((srgb_to_linear(255) - 1.0).abs() < 0.001);

        // Mid-gray is darker in linear
        let mid = srgb_to_linear(128);
        assert!(mid < 0.5);
        assert!(mid > 0.1);
    }
}
