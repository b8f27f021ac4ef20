//! Collector configuration.
//!
//! Handles loading, validating, and merging `docs-collector.toml`. Stock
//! defaults reproduce the layout of a Starlight/Astro docs site living in
//! `docs/`; a config file placed at the project root overrides just the keys
//! it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! output_dir = "docs/src/content/docs"        # Generated docs (relative to root)
//! assets_dir = "docs/src/content/docs/assets" # Processed assets (relative to root)
//! docs_pattern = "**/*.md"                    # Documentation file glob
//! readme_name = "README.md"                   # Per-component README / watch trigger
//! ignore = ["node_modules", "docs", "dist", "vendor", "build", "tmp", "archive"]
//!
//! [images]
//! max_width = 1200          # Bounding box for resized images
//! max_height = 1200
//! quality = 85              # JPEG encoding quality (1-100)
//!
//! [passthrough]
//! enabled = true
//! content_dir = "content"   # Segment stripped from pre-authored docs
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up at the project root when `--config` is not given.
pub const CONFIG_FILE_NAME: &str = "docs-collector.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Collector configuration loaded from `docs-collector.toml`.
///
/// All fields have defaults; user files need only specify overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CollectorConfig {
    /// Generated docs content directory, relative to the project root.
    pub output_dir: String,
    /// Processed assets directory, relative to the project root.
    pub assets_dir: String,
    /// Glob selecting documentation files in the general pass.
    pub docs_pattern: String,
    /// README file name used for components and as the watch trigger.
    pub readme_name: String,
    /// Directory names skipped at any depth.
    pub ignore: Vec<String>,
    /// Image resizing settings.
    pub images: ImagesConfig,
    /// Verbatim copy of pre-authored docs.
    pub passthrough: PassthroughConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            output_dir: "docs/src/content/docs".to_string(),
            assets_dir: "docs/src/content/docs/assets".to_string(),
            docs_pattern: "**/*.md".to_string(),
            readme_name: "README.md".to_string(),
            ignore: ["node_modules", "docs", "dist", "vendor", "build", "tmp", "archive"]
                .into_iter()
                .map(String::from)
                .collect(),
            images: ImagesConfig::default(),
            passthrough: PassthroughConfig::default(),
        }
    }
}

impl CollectorConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.output_dir.trim().is_empty() {
            return Err(ConfigError::Validation("output_dir must not be empty".into()));
        }
        if self.assets_dir.trim().is_empty() {
            return Err(ConfigError::Validation("assets_dir must not be empty".into()));
        }
        if self.readme_name.is_empty() || self.readme_name.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "readme_name must be a plain file name".into(),
            ));
        }
        if let Some(entry) = self
            .ignore
            .iter()
            .find(|d| d.trim().is_empty() || d.contains(['/', '\\']))
        {
            return Err(ConfigError::Validation(format!(
                "ignore entries must be bare directory names, got {entry:?}"
            )));
        }
        if self.images.max_width == 0 || self.images.max_height == 0 {
            return Err(ConfigError::Validation(
                "images.max_width and images.max_height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        if self.passthrough.content_dir.is_empty()
            || self.passthrough.content_dir.contains(['/', '\\'])
        {
            return Err(ConfigError::Validation(
                "passthrough.content_dir must be a single directory name".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the output directories against the project root.
    ///
    /// Absolute paths in the config are kept as they are.
    pub fn layout(&self, root: &Path) -> OutputLayout {
        OutputLayout {
            docs_dir: root.join(&self.output_dir),
            assets_dir: root.join(&self.assets_dir),
        }
    }
}

/// Where generated files land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub docs_dir: PathBuf,
    pub assets_dir: PathBuf,
}

/// Image resizing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Maximum output width in pixels; smaller images are never enlarged.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1200,
            quality: 85,
        }
    }
}

/// Settings for copying already-formatted docs verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PassthroughConfig {
    pub enabled: bool,
    /// Directory name whose Markdown descendants are copied as-is, with this
    /// segment removed from the destination path.
    pub content_dir: String,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content_dir: "content".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(CollectorConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<CollectorConfig, ConfigError> {
    let base = stock_defaults_value();
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: CollectorConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `docs-collector.toml` from the project root, falling back to defaults.
pub fn load_config(root: &Path) -> Result<CollectorConfig, ConfigError> {
    resolve_config(load_raw_config(&root.join(CONFIG_FILE_NAME))?)
}

/// Load an explicitly named config file. Unlike [`load_config`], the file
/// must exist.
pub fn load_config_file(path: &Path) -> Result<CollectorConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    resolve_config(Some(toml::from_str(&content)?))
}

/// Returns a fully-commented stock `docs-collector.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# docs-collector configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Paths are relative to the project root.
# Unknown keys will cause an error.

# Generated documentation content (wiped at the start of every full run).
output_dir = "docs/src/content/docs"

# Processed images and other assets (wiped at the start of every full run).
assets_dir = "docs/src/content/docs/assets"

# Glob selecting documentation files in the general pass.
docs_pattern = "**/*.md"

# README file name: read for every connector/plugin, and the only file
# name that triggers a re-copy in --watch mode.
readme_name = "README.md"

# Directory names skipped at any depth.
ignore = ["node_modules", "docs", "dist", "vendor", "build", "tmp", "archive"]

# ---------------------------------------------------------------------------
# Images under any assets/ directory
# ---------------------------------------------------------------------------
[images]
# Bounding box. Larger images are shrunk to fit, smaller ones are left alone.
max_width = 1200
max_height = 1200

# JPEG encoding quality (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# Pre-authored docs, copied verbatim
# ---------------------------------------------------------------------------
[passthrough]
enabled = true

# Markdown under any <content_dir>/ is copied without frontmatter injection,
# with the <content_dir> segment stripped from the destination path.
content_dir = "content"
"##
}
