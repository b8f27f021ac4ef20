//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which decides what each asset becomes) and the [`backend`](super::backend)
//! (which does the pixel work), so tests can swap in a mock backend without
//! changing operation logic.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Maximum output dimensions. Images are shrunk to fit, never enlarged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::new(1200, 1200)
    }
}

/// Parameters for fitting a still image inside a bounding box.
///
/// The output format follows the output path's extension.
#[derive(Debug, Clone, PartialEq)]
pub struct FitParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bounds: BoundingBox,
    pub quality: Quality,
}

/// Parameters for transcoding an animated GIF to animated WebP.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bounds: BoundingBox,
}
