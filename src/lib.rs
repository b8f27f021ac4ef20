//! # docs-collector
//!
//! Gathers the documentation scattered across a project tree into the
//! content directory of a static documentation site.
//!
//! # What a Run Does
//!
//! ```text
//! project/                              docs/src/content/docs/
//! ├── README.md                    →    ├── index.md
//! ├── services/api/README.md       →    ├── services/api/index.md
//! ├── services/api/guide.md        →    ├── services/api/guide/index.md
//! ├── plugins/foo/README.md        →    ├── plugins/foo.md
//! │                                     ├── plugins/index.md      (generated)
//! ├── connectors/pg/README.md      →    ├── connectors/pg.md
//! │                                     ├── connectors/index.md   (generated)
//! ├── web/assets/logo.png          →    └── assets/logo.png       (fitted to 1200×1200)
//! └── web/assets/demo.gif          →        assets/demo.webp      (animated)
//! ```
//!
//! Markdown without a frontmatter block gets a generated `title` and
//! `description`. The output directories are wiped first, so every full run
//! produces the same tree from the same input.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`paths`] | Separator normalization; every comparison goes through it |
//! | [`config`] | `docs-collector.toml` loading, stock defaults, merging, validation |
//! | [`discover`] | Sorted walkdir + globset discovery with ignore rules |
//! | [`category`] | General / Connector / Plugin classification and destination mapping |
//! | [`naming`] | Title and description derivation from paths |
//! | [`frontmatter`] | Frontmatter detection and injection |
//! | [`imaging`] | Image fitting and GIF → animated WebP behind a backend trait |
//! | [`collect`] | The collector: clean slate, the four passes, single-file copy |
//! | [`watch`] | Filesystem subscription that re-copies changed READMEs |
//! | [`types`] | The per-run report shared with [`output`] |
//! | [`output`] | CLI summary formatting |
//!
//! # Design Decisions
//!
//! ## Sequential Passes
//!
//! Each file is read, transformed and written before the next one is
//! touched, including images, which run on a blocking worker that is awaited
//! before moving on. Output order in logs and reports therefore matches the
//! sorted discovery order.
//!
//! ## Failures Stay Local
//!
//! A file that cannot be read, decoded or written is logged and recorded in
//! the report, and the run continues. A failed image falls back to a byte
//! copy of the original. Only an unusable project root or an invalid glob
//! stops a run.
//!
//! ## Watch Mode Is Narrow
//!
//! After one full run, only README changes are re-copied, each in its own
//! task. Indexes, assets and passthrough content stay as the last full run
//! left them until the next one.

pub mod category;
pub mod collect;
pub mod config;
pub mod discover;
pub mod frontmatter;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod paths;
pub mod types;
pub mod watch;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Install the global tracing subscriber.
///
/// `verbose` raises the default level: 0 = INFO, 1 = DEBUG, 2+ = TRACE.
/// `RUST_LOG` directives are honored on top of it.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
