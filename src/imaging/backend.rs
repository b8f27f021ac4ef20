//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two pixel operations the collector
//! needs: fit and transcode. The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend).

use super::params::{FitParams, TranscodeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Trait for image processing backends.
///
/// Backends are shared with blocking worker tasks, hence `Send + Sync`.
pub trait ImageBackend: Send + Sync {
    /// Shrink a still image to fit its bounding box and re-encode it.
    fn fit(&self, params: &FitParams) -> Result<(), BackendError>;

    /// Re-encode an animated GIF as an animated WebP, fitting every frame.
    fn transcode_animation(&self, params: &TranscodeParams) -> Result<(), BackendError>;
}
