//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Calculate dimensions that fit `source` inside `bounds`.
///
/// Aspect ratio is preserved and images are never enlarged: a source that
/// already fits is returned unchanged. Neither output edge drops below 1px.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `bounds` - Bounding box (max width, max height)
///
/// # Returns
/// * `(width, height)` - Output dimensions, both within `bounds`
pub fn fit_within(source: (u32, u32), bounds: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (max_w, max_h) = bounds;

    if src_w == 0 || src_h == 0 || (src_w <= max_w && src_h <= max_h) {
        return source;
    }

    let scale = (max_w as f64 / src_w as f64).min(max_h as f64 / src_h as f64);
    let w = ((src_w as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((src_h as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}

/// Whether [`fit_within`] would change the dimensions.
pub fn needs_resize(source: (u32, u32), bounds: (u32, u32)) -> bool {
    fit_within(source, bounds) != source
}

/// Convert a frame delay to whole milliseconds for the animation encoder.
///
/// Delays under 20ms are played back at 100ms by browsers; the same
/// convention keeps frame timestamps strictly increasing.
pub fn frame_delay_ms(numer: u32, denom: u32) -> i32 {
    let ms = if denom == 0 { 0 } else { numer / denom };
    if ms < 20 { 100 } else { ms.min(i32::MAX as u32) as i32 }
}
