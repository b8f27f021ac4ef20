//! End-to-end collection runs against temporary project trees, using the real
//! image backend.

use docs_collector::collect::Collector;
use docs_collector::config::CollectorConfig;
use docs_collector::imaging::RustBackend;
use docs_collector::types::AssetAction;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn png(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    RgbaImage::from_pixel(width, height, Rgba([10, 200, 90, 255]))
        .save(path)
        .unwrap();
}

fn gif(root: &Path, rel: &str, width: u32, height: u32) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut encoder = GifEncoder::new(fs::File::create(path).unwrap());
    encoder.set_repeat(Repeat::Infinite).unwrap();
    let frames = [0u8, 255].map(|shade| {
        Frame::from_parts(
            RgbaImage::from_pixel(width, height, Rgba([shade, 0, 255 - shade, 255])),
            0,
            0,
            Delay::from_numer_denom_ms(100, 1),
        )
    });
    encoder.encode_frames(frames).unwrap();
}

fn collector(root: &Path) -> Collector {
    Collector::new(root, CollectorConfig::default(), Arc::new(RustBackend::new())).unwrap()
}

fn docs_dir(root: &Path) -> PathBuf {
    root.join("docs/src/content/docs")
}

fn read_tree(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut tree = BTreeMap::new();
    for entry in walkdir::WalkDir::new(dir) {
        let entry = entry.unwrap();
        if entry.file_type().is_file() {
            let rel = entry
                .path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/");
            tree.insert(rel, fs::read(entry.path()).unwrap());
        }
    }
    tree
}

/// A small project exercising every pass.
fn sample_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(root, "README.md", b"# Sample\n");
    write(root, "services/billing-api/README.md", b"Billing.\n");
    write(root, "services/billing-api/operations.md", b"---\ntitle: Ops\n---\nRunbook\n");
    write(root, "plugins/foo/README.md", b"# Foo plugin\n");
    write(root, "plugins/bar/README.md", b"# Bar plugin\n");
    write(root, "connectors/postgres/README.md", b"# Postgres\n");
    write(root, "node_modules/dep/README.md", b"ignored\n");
    write(root, "guides/content/start.md", b"# Start\n");
    png(root, "web/assets/hero.png", 2400, 1200);
    png(root, "web/assets/icon.png", 64, 64);
    gif(root, "web/assets/demo.gif", 1600, 400);
    write(root, "web/assets/manual.pdf", b"%PDF-1.7\n\x00\x01\x02binary");
    tmp
}

#[tokio::test]
async fn full_run_produces_expected_tree() {
    let tmp = sample_project();
    let report = collector(tmp.path()).run().await.unwrap();
    assert!(report.failures.is_empty(), "{:?}", report.failures);

    let tree = read_tree(&docs_dir(tmp.path()));
    let files: Vec<&str> = tree.keys().map(String::as_str).collect();
    assert_eq!(
        files,
        vec![
            "assets/demo.webp",
            "assets/hero.png",
            "assets/icon.png",
            "assets/manual.pdf",
            "connectors/index.md",
            "connectors/postgres.md",
            "guides/start.md",
            "index.md",
            "plugins/bar.md",
            "plugins/foo.md",
            "plugins/index.md",
            "services/billing-api/index.md",
            "services/billing-api/operations/index.md",
        ]
    );
}

#[tokio::test]
async fn plugin_readme_is_flattened_and_indexed() {
    let tmp = sample_project();
    collector(tmp.path()).run().await.unwrap();
    let out = docs_dir(tmp.path());

    assert!(out.join("plugins/foo.md").is_file());
    assert!(!out.join("plugins/foo/index.md").exists());

    let index = fs::read_to_string(out.join("plugins/index.md")).unwrap();
    assert_eq!(
        index,
        "---\ntitle: Plugins\n\
         description: List of all available plugins and their documentation\n\
         ---\n\n# Available Plugins\n\n- [bar](bar)\n- [foo](foo)\n"
    );
}

#[tokio::test]
async fn readme_without_frontmatter_gets_derived_header() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "a/b/README.md", b"");
    collector(tmp.path()).run().await.unwrap();

    let page = fs::read_to_string(docs_dir(tmp.path()).join("a/b/index.md")).unwrap();
    assert_eq!(
        page,
        "---\ntitle: B\ndescription: Documentation for the a b component\n---\n\n"
    );
}

#[tokio::test]
async fn existing_frontmatter_is_byte_identical() {
    let tmp = sample_project();
    collector(tmp.path()).run().await.unwrap();

    let source = fs::read(tmp.path().join("services/billing-api/operations.md")).unwrap();
    let copied =
        fs::read(docs_dir(tmp.path()).join("services/billing-api/operations/index.md")).unwrap();
    assert_eq!(copied, source);
}

#[tokio::test]
async fn gif_becomes_animated_webp() {
    let tmp = sample_project();
    let report = collector(tmp.path()).run().await.unwrap();
    let assets = docs_dir(tmp.path()).join("assets");

    assert!(!assets.join("demo.gif").exists());
    let webp = fs::read(assets.join("demo.webp")).unwrap();
    assert_eq!(&webp[0..4], b"RIFF");
    assert_eq!(&webp[8..12], b"WEBP");
    assert!(webp.windows(4).any(|w| w == b"ANIM"));

    let demo = report
        .assets
        .iter()
        .find(|a| a.source == "web/assets/demo.gif")
        .unwrap();
    assert_eq!(demo.action, AssetAction::Transcoded);
}

#[tokio::test]
async fn images_fit_without_upscaling() {
    let tmp = sample_project();
    collector(tmp.path()).run().await.unwrap();
    let assets = docs_dir(tmp.path()).join("assets");

    assert_eq!(image::image_dimensions(assets.join("hero.png")).unwrap(), (1200, 600));
    assert_eq!(image::image_dimensions(assets.join("icon.png")).unwrap(), (64, 64));
}

#[tokio::test]
async fn non_image_assets_are_byte_identical() {
    let tmp = sample_project();
    collector(tmp.path()).run().await.unwrap();

    let source = fs::read(tmp.path().join("web/assets/manual.pdf")).unwrap();
    let copied = fs::read(docs_dir(tmp.path()).join("assets/manual.pdf")).unwrap();
    assert_eq!(copied, source);
}

#[tokio::test]
async fn corrupt_image_falls_back_to_copy() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "assets/broken.png", b"definitely not a png");
    let report = collector(tmp.path()).run().await.unwrap();

    assert_eq!(report.assets[0].action, AssetAction::FellBack);
    let copied = fs::read(docs_dir(tmp.path()).join("assets/broken.png")).unwrap();
    assert_eq!(copied, b"definitely not a png");
}

#[tokio::test]
async fn second_run_produces_identical_tree() {
    let tmp = sample_project();
    let c = collector(tmp.path());

    c.run().await.unwrap();
    let first = read_tree(&docs_dir(tmp.path()));
    c.run().await.unwrap();
    let second = read_tree(&docs_dir(tmp.path()));
    assert_eq!(first, second);
}

#[tokio::test]
async fn single_file_copy_keeps_other_output() {
    let tmp = sample_project();
    let c = collector(tmp.path());
    c.run().await.unwrap();

    write(tmp.path(), "services/billing-api/README.md", b"Billing v2.\n");
    let record = c.copy_file("services/billing-api/README.md").await.unwrap();
    assert_eq!(record.destination, "services/billing-api/index.md");

    let out = docs_dir(tmp.path());
    let page = fs::read_to_string(out.join("services/billing-api/index.md")).unwrap();
    assert!(page.ends_with("---\n\nBilling v2.\n"));
    assert!(out.join("plugins/index.md").is_file());
    assert!(out.join("assets/hero.png").is_file());
}

#[tokio::test]
async fn custom_output_directories() {
    let tmp = sample_project();
    let config = CollectorConfig {
        output_dir: "site/pages".to_string(),
        assets_dir: "site/static".to_string(),
        ..CollectorConfig::default()
    };
    Collector::new(tmp.path(), config, Arc::new(RustBackend::new()))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert!(tmp.path().join("site/pages/index.md").is_file());
    assert!(tmp.path().join("site/static/manual.pdf").is_file());

    // A second run must not pick up its own output.
    let report = Collector::new(
        tmp.path(),
        CollectorConfig {
            output_dir: "site/pages".to_string(),
            assets_dir: "site/static".to_string(),
            ..CollectorConfig::default()
        },
        Arc::new(RustBackend::new()),
    )
    .unwrap()
    .run()
    .await
    .unwrap();
    assert!(report.documents.iter().all(|d| !d.source.starts_with("site/")));
}
