//! End-to-end pipeline test: config → scan → index.json → HTML → sitemap.
//!
//! Builds a small blog in a temp directory through the library API, the same
//! sequence `postmill build` runs.

use postmill::config;
use postmill::frontmatter;
use postmill::generate;
use postmill::scan::{self, INDEX_FILENAME};
use postmill::sitemap;
use postmill::types::IndexEntry;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn setup_blog() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "blog.toml",
        "output_dir = \"public\"\n\n[site]\ntitle = \"Lab Book\"\nurl = \"https://lab.example.org/\"\n",
    );
    write(
        root,
        "posts/first.md",
        "---\ntitle: First Light\ndate: 2024-11-02\ntags:\n  - Optics\n  - Setup\n---\n\nAligned the bench today.\n![Bench](bench.png)\n",
    );
    write(
        root,
        "posts/second.md",
        "---\ntitle: Second Run\ndate: 2025-02-20\nexcerpt: Numbers are in.\ntags: data, runs\n---\n\n| run | value |\n|-----|-------|\n| 1   | 0.42  |\n",
    );
    write(root, "posts/untitled.md", "---\ndate: 2025-03-01\n---\n\nNo title here.\n");
    write(root, "posts/images/bench.png", "png");
    tmp
}

#[test]
fn full_build_writes_index_pages_images_and_sitemap() {
    let tmp = setup_blog();
    let root = tmp.path();

    let site = config::load_config(root).unwrap();
    assert_eq!(site.site.title, "Lab Book");
    assert_eq!(site.posts_dir, "posts");
    let posts_dir = root.join(&site.posts_dir);
    let output_dir = root.join(&site.output_dir);

    let scanned = scan::scan(&posts_dir, &site).unwrap();
    assert_eq!(scanned.skipped.len(), 1);
    assert_eq!(scanned.skipped[0].file, "untitled.md");

    let index_path = scan::write_index(&posts_dir, &scanned.entries()).unwrap();
    assert_eq!(index_path, posts_dir.join(INDEX_FILENAME));
    let index: Vec<IndexEntry> =
        serde_json::from_str(&fs::read_to_string(&index_path).unwrap()).unwrap();
    let slugs: Vec<&str> = index.iter().map(|e| e.slug.as_str()).collect();
    assert_eq!(slugs, vec!["second", "first"]);
    assert_eq!(index[0].title, "Second Run");
    assert_eq!(index[0].excerpt, "Numbers are in.");
    assert_eq!(index[0].tags, vec!["data", "runs"]);
    assert_eq!(index[1].tags, vec!["Optics", "Setup"]);
    assert_eq!(index[1].read_time, "1 min read");

    let raw: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&index_path).unwrap()).unwrap();
    assert!(raw[0].get("readTime").is_some());

    let report = generate::generate(&scanned, &site, &posts_dir, &output_dir).unwrap();
    assert_eq!(report.pages, vec!["posts/second.html", "posts/first.html"]);

    let first = fs::read_to_string(output_dir.join("posts/first.html")).unwrap();
    assert!(first.contains("<title>First Light \u{2014} Lab Book</title>"));
    assert!(first.contains(r#"<link rel="canonical" href="https://lab.example.org/posts/first.html">"#));
    assert!(first.contains(r#"src="images/bench.png""#));
    assert!(first.contains("<figcaption>Bench</figcaption>"));

    let second = fs::read_to_string(output_dir.join("posts/second.html")).unwrap();
    assert!(second.contains("<table>"));

    let listing = fs::read_to_string(output_dir.join("posts/index.html")).unwrap();
    assert!(listing.find("Second Run").unwrap() < listing.find("First Light").unwrap());
    assert!(!listing.contains("No title here"));

    assert!(output_dir.join("posts/images/bench.png").is_file());
    assert!(output_dir.join("posts").join(INDEX_FILENAME).is_file());

    let xml = sitemap::build_sitemap(&scanned.entries(), site.base_url().unwrap());
    let sitemap_path = sitemap::write_sitemap(&output_dir, &xml).unwrap();
    let written = fs::read_to_string(sitemap_path).unwrap();
    assert!(written.contains("<loc>https://lab.example.org/posts/second.html</loc>"));
    assert!(written.contains("<lastmod>2025-02-20</lastmod>"));
}

#[test]
fn empty_posts_directory_builds_empty_listing() {
    let tmp = TempDir::new().unwrap();
    let site = config::load_config(tmp.path()).unwrap();
    let posts_dir = tmp.path().join(&site.posts_dir);
    let output_dir = tmp.path().join(&site.output_dir);

    let scanned = scan::scan(&posts_dir, &site).unwrap();
    assert!(scanned.posts.is_empty());
    assert!(posts_dir.is_dir());

    let index_path = scan::write_index(&posts_dir, &scanned.entries()).unwrap();
    assert_eq!(fs::read_to_string(index_path).unwrap().trim(), "[]");

    let report = generate::generate(&scanned, &site, &posts_dir, &output_dir).unwrap();
    assert!(report.pages.is_empty());
    let listing = fs::read_to_string(output_dir.join("posts/index.html")).unwrap();
    assert!(listing.contains("No posts yet. Check back soon."));
}

#[test]
fn unknown_config_key_is_rejected() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "blog.toml", "[site]\ntitel = \"typo\"\n");
    assert!(config::load_config(tmp.path()).is_err());
}

#[test]
fn rendered_frontmatter_scans_back_to_same_entry() {
    let tmp = TempDir::new().unwrap();
    let posts_dir = tmp.path().join("posts");

    let mut metadata = frontmatter::Metadata::new();
    metadata.set_text("title", "Round Trip");
    metadata.set_text("date", "2025-05-05");
    metadata.set_tags(vec!["a".to_string(), "b".to_string()]);
    let text = frontmatter::render(&metadata, "Body text.");
    write(&posts_dir, "round-trip.md", &text);

    let scanned = scan::scan(&posts_dir, &config::SiteConfig::default()).unwrap();
    let entry = &scanned.posts[0].entry;
    assert_eq!(entry.title, "Round Trip");
    assert_eq!(entry.date, "2025-05-05");
    assert_eq!(entry.tags, vec!["a", "b"]);
    assert_eq!(scanned.posts[0].body, "Body text.");
}
