//! Error type for scene construction and rendering.

use thiserror::Error;

/// Errors that can occur while building a scene or driving a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid camera: {0}")]
    InvalidCamera(String),

    #[error("Invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;
