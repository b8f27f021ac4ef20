//! Pure Rust image processing backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP, GIF) | `image` crate decoders |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Encode JPEG / PNG / still WebP | `image::codecs::{jpeg, png, webp}` |
//! | GIF frames | `image::codecs::gif::GifDecoder` + `AnimationDecoder` |
//! | Encode animated WebP | `webp_animation::Encoder` |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{fit_within, frame_delay_ms, needs_resize};
use super::params::{FitParams, TranscodeParams};
use image::codecs::gif::GifDecoder;
use image::imageops::FilterType;
use image::{AnimationDecoder, DynamicImage, ImageDecoder, ImageReader, RgbaImage};
use std::io::BufReader;
use std::path::Path;

/// Backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)?
        .decode()
        .map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
        })
}

/// Save a DynamicImage to the given path, choosing the encoder from the extension.
fn save_image(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let file = std::fs::File::create(path).map_err(BackendError::Io)?;
    let writer = std::io::BufWriter::new(file);

    let result = match ext.as_str() {
        "jpg" | "jpeg" => {
            // JPEG has no alpha channel
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.clamp(1, 100) as u8);
            DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)
        }
        "png" => img.write_with_encoder(image::codecs::png::PngEncoder::new(writer)),
        "webp" => DynamicImage::ImageRgba8(img.to_rgba8())
            .write_with_encoder(image::codecs::webp::WebPEncoder::new_lossless(writer)),
        other => {
            return Err(BackendError::ProcessingFailed(format!(
                "Unsupported output format: {}",
                other
            )));
        }
    };

    result.map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to encode {}: {}", path.display(), e))
    })
}

/// Decode every frame of a GIF as a full-canvas RGBA image with its delay.
fn decode_gif_frames(path: &Path) -> Result<((u32, u32), Vec<(RgbaImage, i32)>), BackendError> {
    let file = std::fs::File::open(path).map_err(BackendError::Io)?;
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to read GIF {}: {}", path.display(), e))
    })?;
    let canvas = decoder.dimensions();

    let frames = decoder.into_frames().collect_frames().map_err(|e| {
        BackendError::ProcessingFailed(format!(
            "Failed to decode GIF frames {}: {}",
            path.display(),
            e
        ))
    })?;
    if frames.is_empty() {
        return Err(BackendError::ProcessingFailed(format!(
            "GIF has no frames: {}",
            path.display()
        )));
    }

    let decoded = frames
        .into_iter()
        .map(|frame| {
            let (numer, denom) = frame.delay().numer_denom_ms();
            let (left, top) = (frame.left(), frame.top());
            let buffer = frame.into_buffer();
            let full = if buffer.dimensions() == canvas {
                buffer
            } else {
                let mut full = RgbaImage::new(canvas.0, canvas.1);
                image::imageops::overlay(&mut full, &buffer, left as i64, top as i64);
                full
            };
            (full, frame_delay_ms(numer, denom))
        })
        .collect();

    Ok((canvas, decoded))
}

impl ImageBackend for RustBackend {
    fn fit(&self, params: &FitParams) -> Result<(), BackendError> {
        let img = load_image(&params.source)?;
        let source = (img.width(), img.height());
        let bounds = params.bounds.as_tuple();
        let fitted = if needs_resize(source, bounds) {
            let (w, h) = fit_within(source, bounds);
            img.resize_exact(w, h, FilterType::Lanczos3)
        } else {
            img
        };
        save_image(&fitted, &params.output, params.quality.value())
    }

    fn transcode_animation(&self, params: &TranscodeParams) -> Result<(), BackendError> {
        let (canvas, frames) = decode_gif_frames(&params.source)?;
        let (w, h) = fit_within(canvas, params.bounds.as_tuple());

        let mut encoder = webp_animation::Encoder::new((w, h)).map_err(|e| {
            BackendError::ProcessingFailed(format!("WebP encoder init failed: {e:?}"))
        })?;

        let mut timestamp = 0i32;
        for (frame, delay) in &frames {
            let scaled;
            let pixels = if (w, h) == canvas {
                frame
            } else {
                scaled = image::imageops::resize(frame, w, h, FilterType::Lanczos3);
                &scaled
            };
            encoder.add_frame(pixels.as_raw(), timestamp).map_err(|e| {
                BackendError::ProcessingFailed(format!("WebP frame encode failed: {e:?}"))
            })?;
            timestamp = timestamp.saturating_add(*delay);
        }

        let data = encoder.finalize(timestamp).map_err(|e| {
            BackendError::ProcessingFailed(format!("WebP finalize failed: {e:?}"))
        })?;
        std::fs::write(&params.output, &*data).map_err(BackendError::Io)
    }
}
