//! High-level asset operations.
//!
//! Decides what each asset file becomes (fitted still image, transcoded
//! animation, or plain copy), builds the parameters, and calls the backend.
//! Every image failure degrades to a verbatim copy under the original name.

use super::backend::{BackendError, ImageBackend};
use super::params::{BoundingBox, FitParams, Quality, TranscodeParams};
use crate::config::ImagesConfig;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Result type for asset operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Extensions re-encoded in their own format after fitting.
pub const STILL_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Extensions transcoded to animated WebP.
pub const ANIMATED_EXTENSIONS: &[&str] = &["gif"];

/// How an asset is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    StillImage,
    AnimatedImage,
    Other,
}

/// Classify an asset by extension (case-insensitive).
pub fn classify(path: &Path) -> AssetKind {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if STILL_EXTENSIONS.contains(&ext.as_str()) {
        AssetKind::StillImage
    } else if ANIMATED_EXTENSIONS.contains(&ext.as_str()) {
        AssetKind::AnimatedImage
    } else {
        AssetKind::Other
    }
}

/// Output file name for an asset: animations swap their extension for `.webp`.
pub fn output_file_name(file_name: &str, kind: AssetKind) -> String {
    match kind {
        AssetKind::AnimatedImage => {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| file_name.to_string());
            format!("{stem}.webp")
        }
        AssetKind::StillImage | AssetKind::Other => file_name.to_string(),
    }
}

/// Bounding box and encoder quality for asset images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageSettings {
    pub bounds: BoundingBox,
    pub quality: Quality,
}

impl From<&ImagesConfig> for ImageSettings {
    fn from(config: &ImagesConfig) -> Self {
        Self {
            bounds: BoundingBox::new(config.max_width, config.max_height),
            quality: Quality::new(config.quality),
        }
    }
}

/// What happened to one asset.
#[derive(Debug)]
pub enum AssetOutcome {
    /// Still image fitted and re-encoded.
    Resized(PathBuf),
    /// Animated GIF re-encoded as animated WebP.
    Transcoded(PathBuf),
    /// Not an image; bytes copied.
    Copied(PathBuf),
    /// Image processing failed; bytes copied under the original name.
    FellBack { path: PathBuf, error: BackendError },
}

impl AssetOutcome {
    pub fn path(&self) -> &Path {
        match self {
            AssetOutcome::Resized(p)
            | AssetOutcome::Transcoded(p)
            | AssetOutcome::Copied(p)
            | AssetOutcome::FellBack { path: p, .. } => p,
        }
    }
}

/// Process one asset into `target_dir`, flattened by file name.
///
/// Only the fallback copy itself can fail this call.
pub fn process_asset(
    backend: &dyn ImageBackend,
    source: &Path,
    target_dir: &Path,
    settings: &ImageSettings,
) -> Result<AssetOutcome> {
    let file_name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            BackendError::ProcessingFailed(format!("asset has no file name: {}", source.display()))
        })?;
    let kind = classify(source);
    let copy_target = target_dir.join(&file_name);

    let attempt = match kind {
        AssetKind::Other => {
            std::fs::copy(source, &copy_target)?;
            return Ok(AssetOutcome::Copied(copy_target));
        }
        AssetKind::StillImage => {
            let output = target_dir.join(output_file_name(&file_name, kind));
            backend
                .fit(&FitParams {
                    source: source.to_path_buf(),
                    output: output.clone(),
                    bounds: settings.bounds,
                    quality: settings.quality,
                })
                .map(|()| AssetOutcome::Resized(output))
        }
        AssetKind::AnimatedImage => {
            let output = target_dir.join(output_file_name(&file_name, kind));
            backend
                .transcode_animation(&TranscodeParams {
                    source: source.to_path_buf(),
                    output: output.clone(),
                    bounds: settings.bounds,
                })
                .map(|()| AssetOutcome::Transcoded(output))
        }
    };

    match attempt {
        Ok(outcome) => Ok(outcome),
        Err(error) => {
            warn!(
                source = %source.display(),
                error = %error,
                "image processing failed, copying original"
            );
            // A half-written output must not shadow the copy.
            let failed_output = target_dir.join(output_file_name(&file_name, kind));
            if failed_output != copy_target {
                let _ = std::fs::remove_file(&failed_output);
            }
            std::fs::copy(source, &copy_target)?;
            Ok(AssetOutcome::FellBack {
                path: copy_target,
                error,
            })
        }
    }
}
