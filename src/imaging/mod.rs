//! Asset image processing.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Fit still image** | Lanczos3 resize + re-encode in the source format |
//! | **GIF → animated WebP** | `GifDecoder` frames + `webp_animation::Encoder` |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: Per-asset decision and fallback logic

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, ImageBackend};
pub use operations::{AssetKind, AssetOutcome, ImageSettings, classify, process_asset};
pub use params::{BoundingBox, FitParams, Quality, TranscodeParams};
pub use rust_backend::RustBackend;
