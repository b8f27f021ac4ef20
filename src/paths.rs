//! Path normalization.
//!
//! Every path the collector compares, matches against a glob, or tests for
//! directory membership goes through [`normalize`] first, so the rest of the
//! crate only ever sees `/`-separated, root-relative strings regardless of
//! the host's native separator.

use std::path::Path;

/// Canonical separator used for every comparison.
pub const SEPARATOR: char = '/';

/// Convert any path string to forward-slash form.
///
/// Idempotent: `normalize(&normalize(p)) == normalize(p)`.
pub fn normalize(path: &str) -> String {
    path.replace('\\', "/")
}

/// Normalize a filesystem path.
pub fn to_slash(path: &Path) -> String {
    normalize(&path.to_string_lossy())
}

/// Express `path` relative to `root` in normalized form.
///
/// Returns `None` when `path` is not inside `root`, or is `root` itself.
pub fn relative_to(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = to_slash(rel);
    if rel.is_empty() { None } else { Some(rel) }
}

/// Non-empty path segments of a normalized path, skipping `.` components.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty() && *s != ".")
}

/// Directory part of a normalized path (`""` for a root-level file).
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Last segment of a normalized path.
pub fn file_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// File name without its final extension.
pub fn file_stem(path: &str) -> &str {
    let name = file_name(path);
    match name.rfind('.') {
        Some(0) | None => name,
        Some(pos) => &name[..pos],
    }
}
