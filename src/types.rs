//! Shared types passed from the collector to CLI output.
//!
//! A [`CollectReport`] is built up during one full run and only exists for
//! the end-of-run summary; it is never written to disk.

use crate::category::Category;

/// A markdown file copied into the docs tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRecord {
    /// Root-relative source path
    pub source: String,
    /// Docs-dir-relative destination path
    pub destination: String,
    /// Whether a frontmatter header was prepended
    pub injected: bool,
}

/// A component README copied into its category directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    pub category: Category,
    pub name: String,
    pub document: DocumentRecord,
}

/// A generated category index page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub category: Category,
    pub destination: String,
    pub entries: usize,
}

/// How an asset ended up in the assets directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetAction {
    Resized,
    Transcoded,
    Copied,
    FellBack,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRecord {
    pub source: String,
    /// File name inside the assets directory
    pub output: String,
    pub action: AssetAction,
}

/// A file that could not be collected. The run continued past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub source: String,
    pub message: String,
}

/// Everything one full collection run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectReport {
    pub documents: Vec<DocumentRecord>,
    pub components: Vec<ComponentRecord>,
    pub indexes: Vec<IndexRecord>,
    pub assets: Vec<AssetRecord>,
    /// Full-content files copied verbatim
    pub passthrough: Vec<DocumentRecord>,
    pub failures: Vec<Failure>,
}

impl CollectReport {
    /// Total number of files written.
    pub fn written(&self) -> usize {
        self.documents.len()
            + self.components.len()
            + self.indexes.len()
            + self.assets.len()
            + self.passthrough.len()
    }
}
