//! Lumen Core - pixel data and image I/O for the lumen path tracer.
//!
//! This crate provides:
//!
//! - **Texture images**: `TextureImage`, decoded with the `image` crate into linear RGB
//! - **Frame buffers**: `ImageBuffer`, the 8-bit result of a render
//! - **Output**: the textual P3 pixel stream, and PPM to BMP conversion
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{convert_ppm_to_bmp, ImageBuffer};
//!
//! let mut image = ImageBuffer::new(2, 1);
//! image.set(1, 0, [255, 0, 0]);
//! image.save_ppm("out.ppm")?;
//! convert_ppm_to_bmp("out.ppm", "out.bmp")?;
//! ```

pub mod error;
pub mod ppm;
pub mod texture;

// Re-export commonly used types
pub use error::{ImageError, ImageResult};
pub use ppm::{convert_ppm_to_bmp, ImageBuffer};
pub use texture::TextureImage;
