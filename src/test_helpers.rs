//! Shared test utilities for the docs-collector test suite.
//!
//! Builds small project trees on disk and reads generated output back.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_file(tmp.path(), "plugins/foo/README.md", "# Foo\n");
//! create_test_png(&tmp.path().join("assets/logo.png"), 2400, 1200);
//!
//! // ... run the collector ...
//!
//! let tree = read_tree(&tmp.path().join("docs/src/content/docs"));
//! assert!(tree.contains_key("plugins/foo.md"));
//! ```

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::path::Path;

// =========================================================================
// Fixture writers
// =========================================================================

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Write a solid-color PNG of the given size.
pub fn create_test_png(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let img = RgbaImage::from_pixel(width, height, Rgba([40, 120, 200, 255]));
    img.save(path).unwrap();
}

/// Write a looping GIF with `frames` frames of alternating colors.
pub fn create_test_gif(path: &Path, width: u32, height: u32, frames: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let file = std::fs::File::create(path).unwrap();
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite).unwrap();

    let frames = (0..frames).map(|i| {
        let shade = if i % 2 == 0 { 30 } else { 220 };
        let buffer = RgbaImage::from_pixel(width, height, Rgba([shade, 80, 255 - shade, 255]));
        Frame::from_parts(buffer, 0, 0, Delay::from_numer_denom_ms(80, 1))
    });
    encoder.encode_frames(frames).unwrap();
}

// =========================================================================
// Output readers
// =========================================================================

/// Every file under `dir`, keyed by `/`-separated relative path.
pub fn read_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut tree = BTreeMap::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = crate::paths::relative_to(dir, entry.path()).unwrap();
            tree.insert(rel, std::fs::read(entry.path()).unwrap());
        }
    }
    tree
}
