//! 8-bit frame buffers and the textual P3 pixel stream.
//!
//! A rendered image is written as:
//!
//! ```text
//! P3
//! <width> <height>
//! 255
//! <r> <g> <b>      one line per pixel, row-major, top row first
//! ```
//!
//! The same stream can be read back and re-encoded as a 24-bit BMP.

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{ImageFormat, RgbImage};

use crate::{ImageError, ImageResult};

/// Maximum channel value written to the P3 header.
const MAX_CHANNEL: u32 = 255;

/// An 8-bit RGB image, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0; 3]; width as usize * height as usize],
        }
    }

    /// Wrap existing pixel data, checking it matches the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> ImageResult<Self> {
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
        })
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        self.pixels[(y * self.width + x) as usize] = rgb;
    }

    /// Write the image as a P3 pixel stream.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> std::io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }

    /// Render the P3 pixel stream into a string.
    pub fn to_ppm_string(&self) -> String {
        self.to_string()
    }

    /// Save the image as a `.ppm` file.
    pub fn save_ppm(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        self.write_ppm(BufWriter::new(file))?;
        log::info!("Wrote {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }

    /// Parse a P3 pixel stream. `#` comments are ignored.
    pub fn parse_ppm(text: &str) -> ImageResult<Self> {
        let mut tokens = text
            .lines()
            .map(|line| line.split('#').next().unwrap_or(""))
            .flat_map(str::split_whitespace);

        match tokens.next() {
            Some("P3") => {}
            Some(other) => {
                return Err(ImageError::InvalidPpm(format!("unsupported magic '{}'", other)))
            }
            None => return Err(ImageError::InvalidPpm("empty stream".to_string())),
        }

        let mut header = |name: &str| -> ImageResult<u32> {
            let token = tokens
                .next()
                .ok_or_else(|| ImageError::InvalidPpm(format!("missing {}", name)))?;
            token
                .parse::<u32>()
                .map_err(|_| ImageError::InvalidPpm(format!("bad {} '{}'", name, token)))
        };
        let width = header("width")?;
        let height = header("height")?;
        let max_value = header("max value")?;
        if max_value == 0 || max_value > u16::MAX as u32 {
            return Err(ImageError::InvalidPpm(format!("max value {} out of range", max_value)));
        }

        let channels = tokens
            .map(|token| {
                let value = token
                    .parse::<u32>()
                    .map_err(|_| ImageError::InvalidPpm(format!("bad channel '{}'", token)))?;
                if value > max_value {
                    return Err(ImageError::InvalidPpm(format!(
                        "channel {} exceeds max value {}",
                        value, max_value
                    )));
                }
                Ok((value * MAX_CHANNEL / max_value) as u8)
            })
            .collect::<ImageResult<Vec<u8>>>()?;

        if channels.len() % 3 != 0 {
            return Err(ImageError::InvalidPpm(format!(
                "{} channel values is not a whole number of pixels",
                channels.len()
            )));
        }

        let pixels = channels
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::from_pixels(width, height, pixels)
    }

    /// Read a `.ppm` file written by [`ImageBuffer::save_ppm`].
    pub fn read_ppm(path: impl AsRef<Path>) -> ImageResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse_ppm(&text)
    }

    /// Save the image as a 24-bit BMP.
    pub fn save_bmp(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        let path = path.as_ref();
        let raw: Vec<u8> = self.pixels.iter().flatten().copied().collect();
        let actual = raw.len();
        let rgb = RgbImage::from_raw(self.width, self.height, raw).ok_or(
            ImageError::DimensionMismatch {
                expected: self.width as usize * self.height as usize * 3,
                actual,
            },
        )?;
        rgb.save_with_format(path, ImageFormat::Bmp)?;
        log::info!("Wrote {}x{} bitmap to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// Formats as the P3 pixel stream.
impl fmt::Display for ImageBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "P3")?;
        writeln!(f, "{} {}", self.width, self.height)?;
        writeln!(f, "{}", MAX_CHANNEL)?;
        for [r, g, b] in &self.pixels {
            writeln!(f, "{} {} {}", r, g, b)?;
        }
        Ok(())
    }
}

/// Convert a P3 `.ppm` file into a 24-bit `.bmp` file.
pub fn convert_ppm_to_bmp(ppm: impl AsRef<Path>, bmp: impl AsRef<Path>) -> ImageResult<()> {
    ImageBuffer::read_ppm(ppm)?.save_bmp(bmp)
}
