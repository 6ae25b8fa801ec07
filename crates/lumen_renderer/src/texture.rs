//! Procedural and image-backed surface textures.

use std::path::Path;

use crate::Color;
use lumen_core::TextureImage;
use lumen_math::Vec3;

/// Scale of the fallback checker pattern.
const DEFAULT_CHECKER_SCALE: f32 = 5.0;

/// A texture maps a surface point and its (u, v) coordinates to a colour.
pub trait Texture: Send + Sync {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color;
}

/// 3D checker pattern, alternating on the parity of the scaled cell index.
#[derive(Debug, Clone, Copy)]
pub struct CheckerTexture {
    even: Color,
    odd: Color,
    scale: f32,
}

impl CheckerTexture {
    pub fn new(even: Color, odd: Color, scale: f32) -> Self {
        Self { even, odd, scale }
    }
}

impl Texture for CheckerTexture {
    fn value(&self, _u: f32, _v: f32, p: Vec3) -> Color {
        let cell = (self.scale * p).floor();
        // Wrapping keeps the parity when far-away cells saturate the cast
        let sum = (cell.x as i64)
            .wrapping_add(cell.y as i64)
            .wrapping_add(cell.z as i64);
        if sum.rem_euclid(2) == 0 {
            self.even
        } else {
            self.odd
        }
    }
}

/// Red and white checker used when no better texture is available.
#[derive(Debug, Clone, Copy)]
pub struct DefaultChecker(CheckerTexture);

impl DefaultChecker {
    pub fn new() -> Self {
        Self(CheckerTexture::new(
            Color::new(1.0, 0.0, 0.0),
            Color::ONE,
            DEFAULT_CHECKER_SCALE,
        ))
    }
}

impl Default for DefaultChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl Texture for DefaultChecker {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        self.0.value(u, v, p)
    }
}

/// Bilinearly filtered image lookup by (u, v).
///
/// If the image could not be loaded the texture renders as [`DefaultChecker`].
pub struct ImageTexture {
    image: Option<TextureImage>,
    fallback: DefaultChecker,
}

impl ImageTexture {
    /// Load an image file. Failure is logged and the fallback pattern is used.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let image = match TextureImage::load(path) {
            Ok(image) => Some(image),
            Err(e) => {
                log::error!(
                    "{} image failed to load ({}), using default texture",
                    path.display(),
                    e
                );
                None
            }
        };

        Self {
            image,
            fallback: DefaultChecker::new(),
        }
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: TextureImage) -> Self {
        Self {
            image: Some(image),
            fallback: DefaultChecker::new(),
        }
    }

    /// True when the image loaded and is being sampled.
    pub fn is_loaded(&self) -> bool {
        self.image.is_some()
    }
}

impl Texture for ImageTexture {
    fn value(&self, u: f32, v: f32, p: Vec3) -> Color {
        match &self.image {
            Some(image) => image.sample(u, v),
            None => self.fallback.value(u, v, p),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checker_parity() {
        let checker = CheckerTexture::new(Color::ONE, Color::ZERO, 1.0);

        assert_eq!(checker.value(0.0, 0.0, Vec3::new(0.5, 0.5, 0.5)), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1.5, 0.5, 0.5)), Color::ZERO);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1.5, 1.5, 0.5)), Color::ONE);

        // Negative cells: floor(-0.5) = -1 is odd
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-0.5, 0.5, 0.5)), Color::ZERO);
    }

    #[test]
    fn test_checker_far_from_origin() {
        let checker = CheckerTexture::new(Color::ONE, Color::ZERO, 5.0);

        // Cells 5e9 + 5e9 + 0 sum past i32::MAX and stay even
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(1e9, 1e9, 0.0)), Color::ONE);
        assert_eq!(checker.value(0.0, 0.0, Vec3::new(-1e9, -1e9, 0.1)), Color::ONE);

        // Saturated cells still pick one of the two colors
        let c = checker.value(0.0, 0.0, Vec3::splat(1e30));
        assert!(c == Color::ONE || c == Color::ZERO);
    }

    #[test]
    fn test_default_checker_colors() {
        let checker = DefaultChecker::new();

        // 5 * 0.1 = 0.5 -> cell 0, even -> red
        assert_eq!(
            checker.value(0.0, 0.0, Vec3::splat(0.1)),
            Color::new(1.0, 0.0, 0.0)
        );
        // 5 * 0.3 = 1.5 -> x cell 1, odd -> white
        assert_eq!(
            checker.value(0.0, 0.0, Vec3::new(0.3, 0.1, 0.1)),
            Color::ONE
        );
    }

    #[test]
    fn test_image_texture_falls_back_to_checker() {
        let texture = ImageTexture::new("no/such/texture.jpg");
        assert!(!texture.is_loaded());

        let p = Vec3::splat(0.1);
        assert_eq!(texture.value(0.3, 0.7, p), DefaultChecker::new().value(0.3, 0.7, p));
    }

    #[test]
    fn test_image_texture_samples_image() {
        let image = TextureImage::from_pixels(1, 1, vec![[0.25, 0.5, 0.75]]).unwrap();
        let texture = ImageTexture::from_image(image);

        assert!(texture.is_loaded());
        assert_eq!(
            texture.value(0.9, 0.1, Vec3::ZERO),
            Color::new(0.25, 0.5, 0.75)
        );
    }
}
