//! Display titles and descriptions derived from source paths.
//!
//! Documents without their own frontmatter get a title from the directory
//! that holds them and a description built from the path segments:
//!
//! - `connectors/postgres-cdc/README.md` → "Postgres Cdc"
//! - `services/authServer/README.md` → "Auth Server"
//! - `README.md` → "Root Documentation"
//!
//! Index-style file names (`README.md`, `index.md`) are recognized ASCII
//! case-insensitively throughout the crate via [`is_index_name`].

use crate::paths;

/// Title used for a document at the project root.
pub const ROOT_TITLE: &str = "Root Documentation";

/// Description used when no path segments remain.
pub const ROOT_DESCRIPTION: &str = "Main project documentation";

const INDEX_NAMES: &[&str] = &["readme.md", "index.md"];

/// Whether a file name is a generic "index" document for its directory.
pub fn is_index_name(name: &str) -> bool {
    INDEX_NAMES.iter().any(|n| name.eq_ignore_ascii_case(n))
}

/// Convert a kebab, snake, or camel case name to Title Case.
///
/// - `"my-cool_thing"` → `"My Cool Thing"`
/// - `"fooBar"` → `"Foo Bar"`
/// - `"API"` → `"Api"`
pub fn title_case(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;
    for c in name.chars() {
        match c {
            '-' | '_' => spaced.push(' '),
            _ => {
                if c.is_ascii_uppercase() && prev.is_some_and(|p| p.is_ascii_lowercase()) {
                    spaced.push(' ');
                }
                spaced.push(c);
            }
        }
        prev = Some(c);
    }

    spaced
        .split(' ')
        .filter(|w| !w.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Title for a document: its containing directory in Title Case.
pub fn derive_title(rel_path: &str) -> String {
    let rel = paths::normalize(rel_path);
    match paths::segments(paths::parent(&rel)).last() {
        Some(dir) => title_case(dir),
        None => ROOT_TITLE.to_string(),
    }
}

/// Description for a document, built from its path segments.
///
/// The README file name itself is dropped; any other file name is kept so
/// sibling documents stay distinguishable.
pub fn derive_description(rel_path: &str, readme_name: &str) -> String {
    let rel = paths::normalize(rel_path);
    let parts: Vec<&str> = paths::segments(&rel)
        .filter(|s| !s.eq_ignore_ascii_case(readme_name))
        .collect();
    if parts.is_empty() {
        ROOT_DESCRIPTION.to_string()
    } else {
        format!("Documentation for the {} component", parts.join(" "))
    }
}
