//! Errors raised while reading, decoding or writing images.

use thiserror::Error;

/// Errors that can occur during image I/O.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Invalid PPM data: {0}")]
    InvalidPpm(String),

    #[error("Pixel count mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;
