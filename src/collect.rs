//! The doc collector.
//!
//! A full run is a clean slate followed by four sequential passes, each file
//! read, transformed and written before the next one starts:
//!
//! 1. **General docs**: every markdown file outside ignored, asset, content
//!    and component directories, frontmatter injected, mapped by
//!    [`category::destination`].
//! 2. **Assets**: every file under an `assets` directory, flattened by name
//!    into the assets output directory. Images are fitted or transcoded on a
//!    blocking worker.
//! 3. **Components**: one page per `plugins/<name>` and `connectors/<name>`
//!    directory from its README, plus a generated index per category.
//! 4. **Passthrough**: full-content markdown copied verbatim.
//!
//! Per-file failures are logged and recorded in the [`CollectReport`]; only
//! discovery problems abort a run. Directory walks run on blocking workers,
//! file reads and writes go through `tokio::fs`.

use crate::category::{self, Category};
use crate::config::{CollectorConfig, OutputLayout};
use crate::naming::is_index_name;
use crate::discover::{self, DiscoveryError, GlobMatcher, IgnoreRules};
use crate::frontmatter;
use crate::imaging::{AssetOutcome, BackendError, ImageBackend, ImageSettings, process_asset};
use crate::paths;
use crate::types::{
    AssetAction, AssetRecord, CollectReport, ComponentRecord, DocumentRecord, Failure, IndexRecord,
};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Directory name whose contents are treated as assets.
pub const ASSETS_DIR_NAME: &str = "assets";

#[derive(Error, Debug)]
pub enum CollectError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to process asset {path}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: BackendError,
    },
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CollectError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        CollectError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Whether the error means a source file vanished or never existed.
    pub fn is_not_found(&self) -> bool {
        let io = match self {
            CollectError::Io { source, .. } => source,
            CollectError::Asset {
                source: BackendError::Io(source),
                ..
            } => source,
            _ => return false,
        };
        io.kind() == std::io::ErrorKind::NotFound
    }
}

/// Collects documentation from a project root into a docs content tree.
///
/// Watch mode shares one behind an `Arc` with every spawned copy task.
pub struct Collector {
    root: PathBuf,
    config: CollectorConfig,
    layout: OutputLayout,
    ignore: IgnoreRules,
    /// General-pass documents; watch events are held to the same filter.
    documents: GlobMatcher,
    images: ImageSettings,
    backend: Arc<dyn ImageBackend>,
}

impl Collector {
    /// Fails only when `docs_pattern` or the derived exclusions are not
    /// valid globs.
    pub fn new(
        root: impl Into<PathBuf>,
        config: CollectorConfig,
        backend: Arc<dyn ImageBackend>,
    ) -> Result<Self, DiscoveryError> {
        let root = root.into();
        let layout = config.layout(&root);
        let ignore = IgnoreRules::new(&config.ignore)
            .with_output_dir(&root, &layout.docs_dir)
            .with_output_dir(&root, &layout.assets_dir);
        let documents = document_matcher(&config)?;
        let images = ImageSettings::from(&config.images);
        Ok(Self {
            root,
            config,
            layout,
            ignore,
            documents,
            images,
            backend,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Clean slate, then a full collection.
    pub async fn run(&self) -> Result<CollectReport, CollectError> {
        if let Err(e) = self.clean().await {
            error!(error = %e, "failed to clean output directories");
        }
        self.collect().await
    }

    /// Remove both output directories. Missing directories are fine.
    pub async fn clean(&self) -> Result<(), CollectError> {
        for dir in [&self.layout.docs_dir, &self.layout.assets_dir] {
            match tokio::fs::remove_dir_all(dir).await {
                Ok(()) => debug!(dir = %dir.display(), "removed output directory"),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(CollectError::io(dir, e)),
            }
        }
        Ok(())
    }

    /// Run every collection pass without cleaning first.
    pub async fn collect(&self) -> Result<CollectReport, CollectError> {
        let mut report = CollectReport::default();

        let documents = self.discover_documents().await?;
        info!(count = documents.len(), "found documentation files");
        let owners = destination_owners(&documents);
        for rel in &documents {
            let destination = document_destination(rel);
            if let Some(owner) = owners.get(&destination).filter(|owner| **owner != rel.as_str()) {
                warn!(source = %rel, destination = %destination, kept = %owner, "destination already taken, skipping");
                report.failures.push(Failure {
                    source: rel.clone(),
                    message: format!("{destination} is already written from {owner}"),
                });
                continue;
            }
            match self.copy_file(rel).await {
                Ok(record) => report.documents.push(record),
                Err(e) => record_failure(&mut report, rel, e),
            }
        }

        self.copy_assets(&mut report).await?;

        for category in Category::COMPONENTS {
            self.collect_category(category, &mut report).await;
        }

        if self.config.passthrough.enabled {
            self.copy_passthrough(&mut report).await?;
        }

        info!(written = report.written(), failed = report.failures.len(), "collection completed");
        Ok(report)
    }

    /// Markdown files for the general pass, in walk order.
    pub async fn discover_documents(&self) -> Result<Vec<String>, CollectError> {
        self.walk(self.documents.clone()).await
    }

    /// Run a discovery walk on a blocking worker.
    async fn walk(&self, matcher: GlobMatcher) -> Result<Vec<String>, CollectError> {
        let root = self.root.clone();
        let ignore = self.ignore.clone();
        let files =
            tokio::task::spawn_blocking(move || discover::discover(&root, &matcher, &ignore))
                .await??;
        Ok(files)
    }

    /// Copy one root-relative markdown file to its mapped destination.
    ///
    /// Used for every file of the general pass and for watch events; never
    /// cleans, never touches indexes or assets.
    pub async fn copy_file(&self, rel_path: &str) -> Result<DocumentRecord, CollectError> {
        let rel = paths::normalize(rel_path);
        let destination = document_destination(&rel);
        let record = self.write_document(&rel, &rel, destination).await?;
        info!(source = %record.source, destination = %record.destination, "copied");
        Ok(record)
    }

    /// Read `source_rel`, inject frontmatter derived from `frontmatter_rel`,
    /// and write it to `destination` under the docs directory.
    async fn write_document(
        &self,
        source_rel: &str,
        frontmatter_rel: &str,
        destination: String,
    ) -> Result<DocumentRecord, CollectError> {
        let source = self.root.join(source_rel);
        let content = tokio::fs::read_to_string(&source)
            .await
            .map_err(|e| CollectError::io(&source, e))?;

        let injected = !frontmatter::has_frontmatter(&content);
        let body = frontmatter::inject(&content, frontmatter_rel, &self.config.readme_name);

        let target = self.layout.docs_dir.join(&destination);
        write_file(&target, body.as_bytes()).await?;

        Ok(DocumentRecord {
            source: source_rel.to_string(),
            destination,
            injected,
        })
    }

    /// Process every asset into the flat assets directory.
    async fn copy_assets(&self, report: &mut CollectReport) -> Result<(), CollectError> {
        let include = [format!("**/{ASSETS_DIR_NAME}/**")];
        let matcher = GlobMatcher::new(&include, &[])?;
        let assets = self.walk(matcher).await?;
        info!(count = assets.len(), "found asset files");
        if assets.is_empty() {
            return Ok(());
        }

        let target_dir = self.layout.assets_dir.clone();
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| CollectError::io(&target_dir, e))?;

        let mut seen = HashSet::new();
        for rel in &assets {
            match self.copy_asset(rel, &target_dir).await {
                Ok(record) => {
                    if !seen.insert(record.output.clone()) {
                        warn!(source = %rel, output = %record.output, "asset name collision, later file wins");
                    }
                    report.assets.push(record);
                }
                Err(e) => record_failure(report, rel, e),
            }
        }
        Ok(())
    }

    async fn copy_asset(&self, rel: &str, target_dir: &Path) -> Result<AssetRecord, CollectError> {
        let source = self.root.join(rel);
        let backend = Arc::clone(&self.backend);
        let settings = self.images;
        let dir = target_dir.to_path_buf();
        let job_source = source.clone();

        let outcome = tokio::task::spawn_blocking(move || {
            process_asset(backend.as_ref(), &job_source, &dir, &settings)
        })
        .await?
        .map_err(|source_err| CollectError::Asset {
            path: source.clone(),
            source: source_err,
        })?;

        let action = match &outcome {
            AssetOutcome::Resized(_) => AssetAction::Resized,
            AssetOutcome::Transcoded(_) => AssetAction::Transcoded,
            AssetOutcome::Copied(_) => AssetAction::Copied,
            AssetOutcome::FellBack { error: e, .. } => {
                error!(source = %rel, error = %e, "image processing failed, copied original");
                AssetAction::FellBack
            }
        };
        let output = outcome
            .path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        debug!(source = %rel, output = %output, ?action, "asset written");

        Ok(AssetRecord {
            source: rel.to_string(),
            output,
            action,
        })
    }

    /// Copy each component README of `category` and write the category index.
    async fn collect_category(&self, category: Category, report: &mut CollectReport) {
        let Some(dir_name) = category.dir_name() else {
            return;
        };
        let source_dir = self.root.join(dir_name);
        let components = match self.list_components(&source_dir).await {
            Ok(components) => components,
            Err(e) => {
                error!(dir = %source_dir.display(), error = %e, "failed to list {}", dir_name);
                return;
            }
        };
        let names: Vec<String> = components.iter().map(|(name, _)| name.clone()).collect();
        debug!(category = category.label(), count = names.len(), "found component directories");

        for (name, readme) in &components {
            let Some(readme) = readme else {
                info!(category = category.label(), name = %name, "no {} found, skipping", self.config.readme_name);
                continue;
            };
            let readme_name = readme
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.config.readme_name.clone());
            let source_rel = format!("{dir_name}/{name}/{readme_name}");
            let frontmatter_rel = format!("{dir_name}/{name}/{}", self.config.readme_name);
            let destination = category::component_destination(dir_name, name);

            match self.write_document(&source_rel, &frontmatter_rel, destination).await {
                Ok(document) => {
                    info!(category = category.label(), name = %name, "generated component page");
                    report.components.push(ComponentRecord {
                        category,
                        name: name.clone(),
                        document,
                    });
                }
                Err(e) => record_failure(report, &source_rel, e),
            }
        }

        let destination = category::index_destination(dir_name);
        let target = self.layout.docs_dir.join(&destination);
        match write_file(&target, category::render_index(category, &names).as_bytes()).await {
            Ok(()) => {
                info!(category = category.label(), entries = names.len(), "generated index");
                report.indexes.push(IndexRecord {
                    category,
                    destination,
                    entries: names.len(),
                });
            }
            Err(e) => record_failure(report, &destination, e),
        }
    }

    /// Non-ignored component directories under `source_dir`, each with its
    /// README if it has one.
    async fn list_components(
        &self,
        source_dir: &Path,
    ) -> Result<Vec<(String, Option<PathBuf>)>, CollectError> {
        let dir = source_dir.to_path_buf();
        let ignore = self.ignore.clone();
        let readme_name = self.config.readme_name.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<(String, Option<PathBuf>)>, CollectError> {
            let names = discover::list_subdirs(&dir).map_err(|e| CollectError::io(&dir, e))?;
            Ok(names
                .into_iter()
                .filter(|name| !ignore.is_ignored_dir(name))
                .map(|name| {
                    let readme = discover::find_file_ignore_case(&dir.join(&name), &readme_name);
                    (name, readme)
                })
                .collect())
        })
        .await?
    }

    /// Copy full-content markdown verbatim, minus its content directory segment.
    async fn copy_passthrough(&self, report: &mut CollectReport) -> Result<(), CollectError> {
        let content_dir = &self.config.passthrough.content_dir;
        let include = [
            format!("**/{content_dir}/**/*.md"),
            format!("**/{content_dir}/**/*.mdx"),
        ];
        let matcher = GlobMatcher::new(&include, &[])?;
        let files = self.walk(matcher).await?;
        debug!(count = files.len(), "found passthrough files");

        for rel in &files {
            let Some(destination) = strip_segment(rel, content_dir) else {
                continue;
            };
            let source = self.root.join(rel);
            let target = self.layout.docs_dir.join(&destination);
            let result = async {
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| CollectError::io(parent, e))?;
                }
                tokio::fs::copy(&source, &target)
                    .await
                    .map_err(|e| CollectError::io(&source, e))
            }
            .await;

            match result {
                Ok(_) => {
                    debug!(source = %rel, destination = %destination, "passed through");
                    report.passthrough.push(DocumentRecord {
                        source: rel.clone(),
                        destination,
                        injected: false,
                    });
                }
                Err(e) => record_failure(report, rel, e),
            }
        }
        Ok(())
    }

    /// Map a changed absolute path to a root-relative README worth re-copying.
    ///
    /// Only READMEs a full run would write as documents qualify: general
    /// documents (not under assets or content directories) and the README
    /// of a top-level `plugins/<name>` or `connectors/<name>` directory.
    /// Anything outside the root, hidden or ignored yields `None`.
    pub fn watch_target(&self, path: &Path) -> Option<String> {
        let rel = paths::relative_to(&self.root, path)?;
        if !paths::file_name(&rel).eq_ignore_ascii_case(&self.config.readme_name) {
            return None;
        }
        if paths::segments(&rel).any(|s| s.starts_with('.')) || self.ignore.is_ignored(&rel) {
            return None;
        }
        if is_component_readme(&rel) || self.documents.is_match(&rel) {
            Some(rel)
        } else {
            None
        }
    }
}

/// Include/exclude globs of the general pass.
fn document_matcher(config: &CollectorConfig) -> Result<GlobMatcher, DiscoveryError> {
    let mut exclude = vec![format!("**/{ASSETS_DIR_NAME}/**")];
    for category in Category::COMPONENTS {
        if let Some(dir) = category.dir_name() {
            exclude.push(format!("**/{dir}/**"));
        }
    }
    if config.passthrough.enabled {
        exclude.push(format!("**/{}/**", config.passthrough.content_dir));
    }
    let include = [config.docs_pattern.clone()];
    GlobMatcher::new(&include, exclude.as_slice())
}

fn document_destination(rel: &str) -> String {
    category::destination(Category::of(rel), rel)
}

/// `<category>/<name>/<readme>` at the top of the root.
fn is_component_readme(rel: &str) -> bool {
    let parts: Vec<&str> = paths::segments(rel).collect();
    parts.len() == 3
        && Category::COMPONENTS
            .iter()
            .filter_map(|c| c.dir_name())
            .any(|dir| parts[0].eq_ignore_ascii_case(dir))
}

/// Which source writes each general destination.
///
/// `dir/stem.md` and `dir/stem/README.md` both map to `dir/stem/index.md`;
/// the README owns it. Otherwise the first file in walk order does.
fn destination_owners(documents: &[String]) -> HashMap<String, &str> {
    let mut owners: HashMap<String, &str> = HashMap::new();
    for rel in documents {
        let destination = document_destination(rel);
        let claim = match owners.get(&destination) {
            None => true,
            Some(owner) => {
                !is_index_name(paths::file_name(owner)) && is_index_name(paths::file_name(rel))
            }
        };
        if claim {
            owners.insert(destination, rel);
        }
    }
    owners
}

/// Remove the first `segment` directory from a normalized path.
fn strip_segment(rel: &str, segment: &str) -> Option<String> {
    let parts: Vec<&str> = paths::segments(rel).collect();
    let pos = parts[..parts.len().saturating_sub(1)]
        .iter()
        .position(|p| p.eq_ignore_ascii_case(segment))?;
    let kept: Vec<&str> = parts
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != pos)
        .map(|(_, p)| *p)
        .collect();
    Some(kept.join("/"))
}

async fn write_file(target: &Path, bytes: &[u8]) -> Result<(), CollectError> {
    if let Some(parent) = target.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| CollectError::io(parent, e))?;
    }
    tokio::fs::write(target, bytes)
        .await
        .map_err(|e| CollectError::io(target, e))
}

fn record_failure(report: &mut CollectReport, source: &str, err: CollectError) {
    if err.is_not_found() {
        info!(source = %source, "source file not found, skipping");
    } else {
        error!(source = %source, error = %err, "failed to collect");
    }
    report.failures.push(Failure {
        source: source.to_string(),
        message: err.to_string(),
    });
}
