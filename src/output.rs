//! CLI output formatting for a collection run.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Each section leads
//! with what was produced (the destination inside the docs tree), with the
//! source path shown as secondary context after an arrow. Sections with no
//! entries are omitted.
//!
//! # Output Format
//!
//! ```text
//! Documents
//! 001 index.md ← README.md
//! 002 services/api/index.md ← services/api/README.md (frontmatter added)
//!
//! Plugins
//! 001 foo → plugins/foo.md
//!     Index: plugins/index.md (2 entries)
//!
//! Assets
//! 001 diagram.png (resized)
//!     Source: a/assets/diagram.png
//! 002 spin.webp (transcoded)
//!     Source: b/assets/spin.gif
//!
//! Failures
//!     broken/README.md: I/O error on ...
//!
//! Collected 2 documents, 1 component, 2 assets (1 failure)
//! ```
//!
//! # Architecture
//!
//! [`format_collect_report`] returns `Vec<String>` for testability and
//! [`print_collect_report`] writes it to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::category::Category;
use crate::types::{AssetAction, CollectReport, DocumentRecord};

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `1 document`, `3 documents`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn entry_count(count: usize) -> String {
    if count == 1 {
        "1 entry".to_string()
    } else {
        format!("{count} entries")
    }
}

fn document_line(index: usize, doc: &DocumentRecord) -> String {
    let note = if doc.injected { " (frontmatter added)" } else { "" };
    format!(
        "{} {} ← {}{}",
        format_index(index),
        doc.destination,
        doc.source,
        note
    )
}

fn action_label(action: AssetAction) -> &'static str {
    match action {
        AssetAction::Resized => "resized",
        AssetAction::Transcoded => "transcoded",
        AssetAction::Copied => "copied",
        AssetAction::FellBack => "copied after image error",
    }
}

// ============================================================================
// Collection report
// ============================================================================

/// Format the end-of-run summary.
pub fn format_collect_report(report: &CollectReport) -> Vec<String> {
    let mut lines = Vec::new();

    if !report.documents.is_empty() {
        lines.push("Documents".to_string());
        for (i, doc) in report.documents.iter().enumerate() {
            lines.push(document_line(i + 1, doc));
        }
    }

    for category in Category::COMPONENTS {
        let components: Vec<_> = report
            .components
            .iter()
            .filter(|c| c.category == category)
            .collect();
        let index = report.indexes.iter().find(|ix| ix.category == category);
        if components.is_empty() && index.is_none() {
            continue;
        }

        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(category.index_title().to_string());
        for (i, component) in components.iter().enumerate() {
            lines.push(format!(
                "{} {} → {}",
                format_index(i + 1),
                component.name,
                component.document.destination
            ));
        }
        if let Some(index) = index {
            lines.push(format!(
                "{}Index: {} ({})",
                indent(1),
                index.destination,
                entry_count(index.entries)
            ));
        }
    }

    if !report.assets.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Assets".to_string());
        for (i, asset) in report.assets.iter().enumerate() {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                asset.output,
                action_label(asset.action)
            ));
            lines.push(format!("{}Source: {}", indent(1), asset.source));
        }
    }

    if !report.passthrough.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Content".to_string());
        for (i, doc) in report.passthrough.iter().enumerate() {
            lines.push(document_line(i + 1, doc));
        }
    }

    if !report.failures.is_empty() {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push("Failures".to_string());
        for failure in &report.failures {
            lines.push(format!("{}{}: {}", indent(1), failure.source, failure.message));
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(summary_line(report));
    lines
}

fn summary_line(report: &CollectReport) -> String {
    let mut summary = format!(
        "Collected {}, {}, {}",
        plural(report.documents.len() + report.passthrough.len(), "document"),
        plural(report.components.len(), "component"),
        plural(report.assets.len(), "asset"),
    );
    if !report.failures.is_empty() {
        summary.push_str(&format!(" ({})", plural(report.failures.len(), "failure")));
    }
    summary
}

/// Print the end-of-run summary to stdout.
pub fn print_collect_report(report: &CollectReport) {
    for line in format_collect_report(report) {
        println!("{}", line);
    }
}
