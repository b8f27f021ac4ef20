//! File discovery by glob pattern.
//!
//! Walks the project root with `walkdir` (sorted by file name so runs are
//! reproducible), prunes hidden entries and ignored directories, and keeps
//! files whose normalized root-relative path matches a [`GlobMatcher`].
//!
//! Only problems with the root itself are errors. An unreadable entry deeper
//! in the tree is logged and skipped.

use crate::paths;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Project root is not a directory: {0}")]
    RootNotFound(PathBuf),
    #[error("Failed to read project root {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Include/exclude glob sets, matched case-insensitively against
/// normalized root-relative paths.
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    include: GlobSet,
    exclude: GlobSet,
}

impl GlobMatcher {
    pub fn new<S: AsRef<str>>(include: &[S], exclude: &[S]) -> Result<Self, DiscoveryError> {
        Ok(Self {
            include: build_set(include)?,
            exclude: build_set(exclude)?,
        })
    }

    pub fn is_match(&self, rel_path: &str) -> bool {
        let rel = paths::normalize(rel_path);
        self.include.is_match(&rel) && !self.exclude.is_match(&rel)
    }
}

fn build_set<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = GlobBuilder::new(pattern)
            .case_insensitive(true)
            .literal_separator(true)
            .build()
            .map_err(|source| DiscoveryError::Pattern {
                pattern: pattern.to_string(),
                source,
            })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| DiscoveryError::Pattern {
        pattern: patterns
            .iter()
            .map(|p| p.as_ref())
            .collect::<Vec<_>>()
            .join(", "),
        source,
    })
}

/// Directories that are never descended into.
///
/// `dirs` are bare names matched at any depth (`node_modules` skips
/// `a/b/node_modules/**`); `prefixes` are root-relative directories such as
/// the collector's own output when it lives inside the root.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    dirs: Vec<String>,
    prefixes: Vec<String>,
}

impl IgnoreRules {
    pub fn new(dirs: &[String]) -> Self {
        Self {
            dirs: dirs.to_vec(),
            prefixes: Vec::new(),
        }
    }

    /// Also ignore everything under `dir`, if it lies inside `root`.
    pub fn with_output_dir(mut self, root: &Path, dir: &Path) -> Self {
        if let Some(rel) = paths::relative_to(root, dir) {
            self.prefixes.push(rel);
        }
        self
    }

    /// Whether a directory name is ignored wherever it appears.
    pub fn is_ignored_dir(&self, name: &str) -> bool {
        self.dirs.iter().any(|d| d.eq_ignore_ascii_case(name))
    }

    /// Whether a root-relative file path lies under an ignored directory.
    pub fn is_ignored(&self, rel_path: &str) -> bool {
        let rel = paths::normalize(rel_path);
        if paths::segments(paths::parent(&rel)).any(|s| self.is_ignored_dir(s)) {
            return true;
        }
        self.prefixes
            .iter()
            .any(|p| rel == *p || rel.starts_with(&format!("{p}/")))
    }
}

/// Find every file under `root` that matches `matcher` and is not ignored.
///
/// Results are root-relative, normalized, and in lexicographic walk order.
pub fn discover(
    root: &Path,
    matcher: &GlobMatcher,
    ignore: &IgnoreRules,
) -> Result<Vec<String>, DiscoveryError> {
    if !root.is_dir() {
        return Err(DiscoveryError::RootNotFound(root.to_path_buf()));
    }

    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            let name = entry.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            if !entry.file_type().is_dir() {
                return true;
            }
            if ignore.is_ignored_dir(&name) {
                return false;
            }
            match paths::relative_to(root, entry.path()) {
                Some(rel) => !ignore.is_ignored(&format!("{rel}/_")),
                None => true,
            }
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(source) if source.depth() == 0 => {
                return Err(DiscoveryError::Walk {
                    path: root.to_path_buf(),
                    source,
                });
            }
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel) = paths::relative_to(root, entry.path()) else {
            continue;
        };
        if matcher.is_match(&rel) && !ignore.is_ignored(&rel) {
            files.push(rel);
        }
    }

    debug!(count = files.len(), root = %root.display(), "discovery finished");
    Ok(files)
}

/// Immediate, non-hidden subdirectories of `dir`, sorted by name.
///
/// A missing `dir` yields an empty list.
pub fn list_subdirs(dir: &Path) -> std::io::Result<Vec<String>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut names: Vec<String> = entries
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| !name.starts_with('.'))
        .collect();
    names.sort();
    Ok(names)
}

/// Find `file_name` inside `dir`, first exactly, then ASCII case-insensitively.
pub fn find_file_ignore_case(dir: &Path, file_name: &str) -> Option<PathBuf> {
    let exact = dir.join(file_name);
    if exact.is_file() {
        return Some(exact);
    }
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(dir)
        .ok()?
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .eq_ignore_ascii_case(file_name)
        })
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    candidates.sort();
    candidates.into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn default_ignore() -> IgnoreRules {
        IgnoreRules::new(&["node_modules".to_string(), "docs".to_string()])
    }

    #[test]
    fn glob_matches_root_and_nested() {
        let m = GlobMatcher::new(&["**/*.md"], &[]).unwrap();
        assert!(m.is_match("README.md"));
        assert!(m.is_match("a/b/README.md"));
        assert!(m.is_match(r"a\b\Guide.MD"));
        assert!(!m.is_match("a/b/main.rs"));
    }

    #[test]
    fn exclusions_win() {
        let m = GlobMatcher::new(&["**/*.md"], &["**/plugins/**"]).unwrap();
        assert!(!m.is_match("plugins/foo/README.md"));
        assert!(m.is_match("src/README.md"));
    }

    #[test]
    fn invalid_pattern_is_error() {
        let err = GlobMatcher::new(&["a/[b"], &[]).unwrap_err();
        assert!(matches!(err, DiscoveryError::Pattern { .. }));
    }

    #[test]
    fn ignore_rules_check_directory_segments() {
        let rules = default_ignore();
        assert!(rules.is_ignored("node_modules/pkg/README.md"));
        assert!(rules.is_ignored("a/Docs/README.md"));
        assert!(!rules.is_ignored("docs.md"));
        assert!(!rules.is_ignored("src/README.md"));
    }

    #[test]
    fn output_prefix_is_ignored() {
        let root = Path::new("/p");
        let rules = IgnoreRules::default().with_output_dir(root, Path::new("/p/site/out"));
        assert!(rules.is_ignored("site/out/index.md"));
        assert!(!rules.is_ignored("site/outside.md"));
    }

    #[test]
    fn discover_finds_sorted_files_and_skips_ignored() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b/README.md");
        touch(tmp.path(), "a/README.md");
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "node_modules/x/README.md");
        touch(tmp.path(), "docs/README.md");
        touch(tmp.path(), ".git/README.md");
        touch(tmp.path(), "a/main.rs");

        let m = GlobMatcher::new(&["**/*.md"], &[]).unwrap();
        let files = discover(tmp.path(), &m, &default_ignore()).unwrap();
        assert_eq!(files, vec!["README.md", "a/README.md", "b/README.md"]);
    }

    #[test]
    fn discover_missing_root_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let m = GlobMatcher::new(&["**/*.md"], &[]).unwrap();
        let err = discover(&tmp.path().join("nope"), &m, &default_ignore()).unwrap_err();
        assert!(matches!(err, DiscoveryError::RootNotFound(_)));
    }

    #[test]
    fn subdirs_sorted_and_missing_dir_empty() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("plugins/zeta")).unwrap();
        fs::create_dir_all(tmp.path().join("plugins/alpha")).unwrap();
        fs::create_dir_all(tmp.path().join("plugins/.cache")).unwrap();
        touch(tmp.path(), "plugins/file.txt");

        assert_eq!(
            list_subdirs(&tmp.path().join("plugins")).unwrap(),
            vec!["alpha", "zeta"]
        );
        assert!(list_subdirs(&tmp.path().join("connectors")).unwrap().is_empty());
    }

    #[test]
    fn readme_lookup_falls_back_to_any_case() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "foo/readme.md");
        let found = find_file_ignore_case(&tmp.path().join("foo"), "README.md").unwrap();
        assert_eq!(found.file_name().unwrap(), "readme.md");
        assert!(find_file_ignore_case(&tmp.path().join("bar"), "README.md").is_none());
    }
}
