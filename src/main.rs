use clap::{Parser, Subcommand};
use docs_collector::collect::Collector;
use docs_collector::imaging::RustBackend;
use docs_collector::{config, output, paths, watch};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "docs-collector")]
#[command(about = "Collect project documentation into a docs site")]
#[command(long_about = "\
Collect project documentation into a docs site

Markdown files and assets scattered across the project are copied into the
site's content directory. Files without frontmatter get a generated title
and description; images are shrunk to fit 1200x1200 and animated GIFs become
animated WebP.

Project layout:

  project/
  ├── docs-collector.toml          # Optional config (see gen-config)
  ├── README.md                    # → index.md
  ├── services/api/README.md       # → services/api/index.md
  ├── services/api/guide.md        # → services/api/guide/index.md
  ├── plugins/<name>/README.md     # → plugins/<name>.md + plugins/index.md
  ├── connectors/<name>/README.md  # → connectors/<name>.md + connectors/index.md
  ├── **/assets/*                  # → flattened into the assets directory
  └── **/content/**/*.md           # → copied verbatim, content/ segment dropped

The output and assets directories are deleted at the start of every run.
With --watch, README changes are re-copied after the first run until the
process is stopped.

Run 'docs-collector gen-config' to generate a documented docs-collector.toml.")]
#[command(version)]
struct Cli {
    /// Project root to collect from
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Config file (default: <root>/docs-collector.toml, if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Docs content output directory, overriding the config
    #[arg(long)]
    output: Option<PathBuf>,

    /// Assets output directory, overriding the config
    #[arg(long)]
    assets_output: Option<PathBuf>,

    /// Keep running and re-copy READMEs when they change
    #[arg(long)]
    watch: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a stock docs-collector.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::GenConfig) = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    docs_collector::init_tracing(cli.verbose);

    let root = std::fs::canonicalize(&cli.root)
        .map_err(|e| format!("cannot open project root {}: {e}", cli.root.display()))?;

    let mut config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&root)?,
    };
    if let Some(dir) = &cli.output {
        config.output_dir = paths::to_slash(&absolutize(dir)?);
    }
    if let Some(dir) = &cli.assets_output {
        config.assets_dir = paths::to_slash(&absolutize(dir)?);
    }

    let collector = Arc::new(Collector::new(root, config, Arc::new(RustBackend::new()))?);
    let report = collector.run().await?;
    output::print_collect_report(&report);

    if cli.watch {
        watch::watch(collector).await?;
    }

    Ok(())
}

/// Resolve a CLI path against the working directory, not the project root.
fn absolutize(path: &std::path::Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
