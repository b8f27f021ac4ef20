//! Document categories and destination mapping.
//!
//! Every source document resolves to exactly one [`Category`], and
//! [`destination`] maps `(category, path)` to the output path relative to the
//! docs content directory:
//!
//! | Source | Category | Destination |
//! |---|---|---|
//! | `README.md` | General | `index.md` |
//! | `services/api/README.md` | General | `services/api/index.md` |
//! | `services/api/guide.md` | General | `services/api/guide/index.md` |
//! | `plugins/foo/README.md` | Plugin | `plugins/foo.md` |
//! | `connectors/pg/readme.md` | Connector | `connectors/pg.md` |
//! | `plugins/foo/usage.md` | Plugin | `plugins/usage.md` |

use crate::naming::is_index_name;
use crate::paths;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    General,
    Connector,
    Plugin,
}

impl Category {
    /// The two categories that are flattened and indexed.
    pub const COMPONENTS: [Category; 2] = [Category::Plugin, Category::Connector];

    /// Resolve the category from the directory segments of a path.
    ///
    /// The first `connectors` or `plugins` segment (ASCII case-insensitive)
    /// wins; the file name itself is never considered.
    pub fn of(rel_path: &str) -> Self {
        let rel = paths::normalize(rel_path);
        paths::segments(paths::parent(&rel))
            .find_map(Self::from_segment)
            .unwrap_or(Category::General)
    }

    fn from_segment(segment: &str) -> Option<Self> {
        Self::COMPONENTS
            .into_iter()
            .find(|c| c.dir_name().is_some_and(|d| segment.eq_ignore_ascii_case(d)))
    }

    /// Source and output directory name for component categories.
    pub fn dir_name(self) -> Option<&'static str> {
        match self {
            Category::General => None,
            Category::Connector => Some("connectors"),
            Category::Plugin => Some("plugins"),
        }
    }

    /// Singular label used in log lines.
    pub fn label(self) -> &'static str {
        match self {
            Category::General => "document",
            Category::Connector => "connector",
            Category::Plugin => "plugin",
        }
    }

    /// Heading and frontmatter title of the generated index.
    pub fn index_title(self) -> &'static str {
        match self {
            Category::General => "Documentation",
            Category::Connector => "Connectors",
            Category::Plugin => "Plugins",
        }
    }
}

/// Map a root-relative source path to its root-relative output path.
pub fn destination(category: Category, rel_path: &str) -> String {
    let rel = paths::normalize(rel_path);
    let name = paths::file_name(&rel);
    let dir = paths::parent(&rel);

    match category.dir_name() {
        None => {
            let target_dir = if is_index_name(name) {
                dir.to_string()
            } else {
                join(dir, paths::file_stem(name))
            };
            join(&target_dir, "index.md")
        }
        Some(category_dir) => {
            let component = if is_index_name(name) {
                // Promote the parent so `plugins/foo/README.md` → `plugins/foo.md`.
                paths::segments(dir)
                    .last()
                    .filter(|d| !d.eq_ignore_ascii_case(category_dir))
                    .unwrap_or_else(|| paths::file_stem(name))
            } else {
                paths::file_stem(name)
            };
            format!("{category_dir}/{component}.md")
        }
    }
}

/// Output path of a category's generated index, under its [`Category::dir_name`].
pub fn index_destination(category_dir: &str) -> String {
    format!("{category_dir}/index.md")
}

/// Output path of one component's page, e.g. `plugins/foo.md`.
pub fn component_destination(category_dir: &str, name: &str) -> String {
    format!("{category_dir}/{name}.md")
}

/// Render a category index page listing `names` as relative links.
pub fn render_index(category: Category, names: &[String]) -> String {
    let title = category.index_title();
    let plural = category.dir_name().unwrap_or("documents");
    let links = names
        .iter()
        .map(|name| format!("- [{name}]({name})"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "---\ntitle: {title}\ndescription: List of all available {plural} and their documentation\n---\n\n# Available {title}\n\n{links}\n"
    )
}

fn join(dir: &str, name: &str) -> String {
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_from_segments() {
        assert_eq!(Category::of("a/b/README.md"), Category::General);
        assert_eq!(Category::of("plugins/foo/README.md"), Category::Plugin);
        assert_eq!(Category::of("connectors/pg/README.md"), Category::Connector);
        assert_eq!(Category::of(r"Plugins\foo\README.md"), Category::Plugin);
    }

    #[test]
    fn file_name_does_not_set_category() {
        assert_eq!(Category::of("docs/plugins"), Category::General);
        assert_eq!(Category::of("plugins.md"), Category::General);
    }

    #[test]
    fn nested_category_segment_counts() {
        assert_eq!(
            Category::of("packages/core/plugins/cache/README.md"),
            Category::Plugin
        );
    }

    #[test]
    fn general_readme_becomes_index() {
        assert_eq!(destination(Category::General, "a/b/README.md"), "a/b/index.md");
        assert_eq!(destination(Category::General, "README.md"), "index.md");
    }

    #[test]
    fn general_other_doc_gets_own_directory() {
        assert_eq!(
            destination(Category::General, "services/api/guide.md"),
            "services/api/guide/index.md"
        );
    }

    #[test]
    fn plugin_readme_is_flattened() {
        assert_eq!(destination(Category::Plugin, "plugins/foo/README.md"), "plugins/foo.md");
    }

    #[test]
    fn connector_lowercase_readme_is_flattened() {
        assert_eq!(
            destination(Category::Connector, "connectors/pg/readme.md"),
            "connectors/pg.md"
        );
    }

    #[test]
    fn component_non_index_doc_named_after_itself() {
        assert_eq!(destination(Category::Plugin, "plugins/foo/usage.md"), "plugins/usage.md");
    }

    #[test]
    fn readme_directly_in_category_dir() {
        assert_eq!(destination(Category::Plugin, "plugins/README.md"), "plugins/README.md");
    }

    #[test]
    fn component_paths() {
        assert_eq!(component_destination("plugins", "foo"), "plugins/foo.md");
        assert_eq!(component_destination("connectors", "pg"), "connectors/pg.md");
    }

    #[test]
    fn plugin_index_lists_components() {
        let names = vec!["alpha".to_string(), "beta".to_string()];
        assert_eq!(
            render_index(Category::Plugin, &names),
            "---\ntitle: Plugins\n\
             description: List of all available plugins and their documentation\n\
             ---\n\n# Available Plugins\n\n- [alpha](alpha)\n- [beta](beta)\n"
        );
    }

    #[test]
    fn empty_index_still_has_heading() {
        let page = render_index(Category::Connector, &[]);
        assert!(page.starts_with("---\ntitle: Connectors\n"));
        assert!(page.contains("# Available Connectors\n"));
        assert!(!page.contains("- ["));
    }

    #[test]
    fn index_paths() {
        assert_eq!(index_destination("plugins"), "plugins/index.md");
        assert_eq!(index_destination("connectors"), "connectors/index.md");
    }
}
