//! Frontmatter detection and injection.
//!
//! A document that already starts with the `---` delimiter is left exactly as
//! it is. Anything else gets a two-field header prepended:
//!
//! ```text
//! ---
//! title: Rate Limit
//! description: Documentation for the plugins rate-limit component
//! ---
//!
//! <original content>
//! ```

use crate::naming;
use std::borrow::Cow;

/// Marker line that opens and closes a metadata block.
pub const DELIMITER: &str = "---";

/// Whether `content` already carries a metadata block.
pub fn has_frontmatter(content: &str) -> bool {
    content.starts_with(DELIMITER)
}

/// The generated metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub description: String,
}

impl Frontmatter {
    /// Derive title and description from a root-relative source path.
    pub fn derive(rel_path: &str, readme_name: &str) -> Self {
        Self {
            title: naming::derive_title(rel_path),
            description: naming::derive_description(rel_path, readme_name),
        }
    }

    pub fn render(&self) -> String {
        format!(
            "{DELIMITER}\ntitle: {}\ndescription: {}\n{DELIMITER}\n\n",
            yaml_scalar(&self.title),
            yaml_scalar(&self.description)
        )
    }
}

/// Prepend a derived header unless the content already has one.
pub fn inject<'a>(content: &'a str, rel_path: &str, readme_name: &str) -> Cow<'a, str> {
    if has_frontmatter(content) {
        return Cow::Borrowed(content);
    }
    let header = Frontmatter::derive(rel_path, readme_name).render();
    Cow::Owned(header + content)
}

/// Render a plain YAML scalar, double-quoting values a parser would misread.
fn yaml_scalar(value: &str) -> Cow<'_, str> {
    const INDICATORS: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%', '@',
        '`',
    ];
    let needs_quotes = value.is_empty()
        || value.starts_with(INDICATORS)
        || value.starts_with(' ')
        || value.ends_with(' ')
        || value.contains(": ")
        || value.contains(" #");
    if needs_quotes {
        Cow::Owned(format!(
            "\"{}\"",
            value.replace('\\', "\\\\").replace('"', "\\\"")
        ))
    } else {
        Cow::Borrowed(value)
    }
}
