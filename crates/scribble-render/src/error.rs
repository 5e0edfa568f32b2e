//! Renderer errors.

use scribble_core::ImageError;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Image decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;
