//! Post discovery and index generation.
//!
//! Stage 1 of the build. Reads every Markdown file in the posts directory,
//! extracts frontmatter, and produces the entries of `index.json`:
//!
//! ```text
//! posts/
//! ├── index.json               # Written by this stage
//! ├── hello-world.md           # slug "hello-world"
//! ├── rust-ownership.md
//! └── images/                  # Copied by the assets stage, ignored here
//! ```
//!
//! ## Field resolution
//!
//! | Field | Source | Default |
//! |-------|--------|---------|
//! | `slug` | file stem | — |
//! | `title` | `title:` | required, post skipped when missing |
//! | `date` | `date:` | empty |
//! | `excerpt` | `excerpt:` | first N body characters + `...` |
//! | `tags` | `tags:` | empty |
//! | `readTime` | body word count | at least 1 minute |
//!
//! Entries are ordered newest first by comparing `date` as a string, which
//! is correct for ISO-8601 dates. Posts with equal dates keep file-name order.
//!
//! `index.md` is skipped: its page would replace the listing page.

use crate::config::SiteConfig;
use crate::frontmatter;
use crate::slug::slug_from_filename;
use crate::types::{IndexEntry, Post};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the generated index inside the posts directory.
pub const INDEX_FILENAME: &str = "index.json";

/// Slug taken by the listing page (`posts/index.html`).
pub const LISTING_SLUG: &str = "index";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of scanning the posts directory.
#[derive(Debug)]
pub struct Scan {
    /// Posts in index order (newest first).
    pub posts: Vec<Post>,
    /// Documents that were not indexed, in file-name order.
    pub skipped: Vec<Skipped>,
}

impl Scan {
    /// Index entries in order, ready for `index.json`.
    pub fn entries(&self) -> Vec<IndexEntry> {
        self.posts.iter().map(|p| p.entry.clone()).collect()
    }
}

/// A document left out of the index, with the reason.
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    pub file: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoTitle,
    /// The file stem is the listing page's name.
    ReservedSlug,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoTitle => write!(f, "no title"),
            SkipReason::ReservedSlug => {
                write!(f, "slug \"{LISTING_SLUG}\" is reserved for the listing page")
            }
        }
    }
}

/// Scan `posts_dir` for Markdown posts.
///
/// The directory is created when missing, so a fresh project scans to an
/// empty index instead of failing.
pub fn scan(posts_dir: &Path, config: &SiteConfig) -> Result<Scan, ScanError> {
    if !posts_dir.exists() {
        fs::create_dir_all(posts_dir)?;
    }

    let mut posts = Vec::new();
    let mut skipped = Vec::new();

    for path in markdown_files(posts_dir)? {
        if slug_from_filename(&path) == LISTING_SLUG {
            skipped.push(Skipped {
                file: file_name(&path),
                reason: SkipReason::ReservedSlug,
            });
            continue;
        }
        let content = fs::read_to_string(&path)?;
        match build_post(&path, &content, config) {
            Some(post) => posts.push(post),
            None => skipped.push(Skipped {
                file: file_name(&path),
                reason: SkipReason::NoTitle,
            }),
        }
    }

    posts.sort_by(|a, b| b.entry.date.cmp(&a.entry.date));

    Ok(Scan { posts, skipped })
}

/// Write `index.json` into the posts directory and return its path.
pub fn write_index(posts_dir: &Path, entries: &[IndexEntry]) -> Result<PathBuf, ScanError> {
    fs::create_dir_all(posts_dir)?;
    let index_path = posts_dir.join(INDEX_FILENAME);
    let json = serde_json::to_string_pretty(entries)?;
    fs::write(&index_path, json)?;
    Ok(index_path)
}

/// All `.md` files directly inside `dir`, sorted by path.
pub fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension().is_some_and(|e| e == "md")
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Build a post from one source document. `None` when it has no title.
fn build_post(path: &Path, content: &str, config: &SiteConfig) -> Option<Post> {
    let doc = frontmatter::parse(content);
    let meta = &doc.metadata;

    let title = meta.text("title").filter(|t| !t.is_empty())?.to_string();

    let word_count = doc.body.split_whitespace().count();
    let read_minutes = read_time_minutes(word_count, config.index.words_per_minute);

    let excerpt = match meta.text("excerpt") {
        Some(excerpt) => excerpt.to_string(),
        None => default_excerpt(&doc.body, config.index.excerpt_length),
    };

    let entry = IndexEntry {
        slug: slug_from_filename(path),
        title,
        date: meta.text("date").unwrap_or_default().to_string(),
        excerpt,
        tags: meta.tags().to_vec(),
        read_time: format!("{read_minutes} min read"),
    };

    Some(Post {
        entry,
        author: meta
            .text("author")
            .filter(|a| !a.is_empty())
            .map(String::from),
        body: doc.body,
        word_count,
        read_minutes,
        source: path.to_path_buf(),
    })
}

/// Estimated minutes to read `word_count` words, never less than one.
///
/// Halves round to the nearest even minute, so 500 words at 200 wpm is
/// 2 minutes and 700 words is 4.
pub fn read_time_minutes(word_count: usize, words_per_minute: u32) -> u32 {
    let wpm = f64::from(words_per_minute.max(1));
    let minutes = (word_count as f64 / wpm).round_ties_even() as u32;
    minutes.max(1)
}

/// First `length` characters of the body followed by `...`.
pub fn default_excerpt(body: &str, length: usize) -> String {
    let mut excerpt: String = body.chars().take(length).collect();
    excerpt.push_str("...");
    excerpt
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn write_post(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn scan_fixture_posts() {
        let tmp = setup_fixtures();
        let scan = scan(&posts_dir(&tmp), &SiteConfig::default()).unwrap();
        assert_eq!(
            post_slugs(&scan),
            vec!["rust-ownership", "hello-world", "undated-notes"]
        );
        assert_eq!(skipped_files(&scan), vec!["draft-without-title.md"]);
    }

    #[test]
    fn fixture_inline_tags() {
        let tmp = setup_fixtures();
        let scan = scan(&posts_dir(&tmp), &SiteConfig::default()).unwrap();
        let post = find_post(&scan, "rust-ownership");
        assert_eq!(post.entry.tags, vec!["rust", "memory"]);
        assert_eq!(post.author.as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn fixture_block_tags() {
        let tmp = setup_fixtures();
        let scan = scan(&posts_dir(&tmp), &SiteConfig::default()).unwrap();
        let post = find_post(&scan, "hello-world");
        assert_eq!(post.entry.tags, vec!["Meta", "Intro"]);
        assert_eq!(post.entry.excerpt, "First post on the new blog.");
    }

    #[test]
    fn missing_posts_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("posts");
        let scan = scan(&dir, &SiteConfig::default()).unwrap();
        assert!(scan.posts.is_empty());
        assert!(dir.is_dir());
    }

    #[test]
    fn non_markdown_files_and_subdirs_ignored() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.md", "---\ntitle: A\n---\nbody");
        write_post(tmp.path(), "index.json", "[]");
        write_post(tmp.path(), "notes.txt", "---\ntitle: Nope\n---\n");
        fs::create_dir(tmp.path().join("images")).unwrap();
        write_post(&tmp.path().join("images"), "nested.md", "---\ntitle: Nested\n---\n");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(post_slugs(&scan), vec!["a"]);
    }

    #[test]
    fn only_lowercase_md_extension_is_scanned() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.md", "---\ntitle: Lower\n---\nbody");
        write_post(tmp.path(), "b.MD", "---\ntitle: Upper\n---\nbody");
        write_post(tmp.path(), "c.Md", "---\ntitle: Mixed\n---\nbody");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(post_slugs(&scan), vec!["a"]);
        assert!(scan.skipped.is_empty());
    }

    #[test]
    fn empty_title_is_skipped() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "blank.md", "---\ntitle:\n---\nbody");
        write_post(tmp.path(), "plain.md", "no frontmatter at all");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert!(scan.posts.is_empty());
        assert_eq!(skipped_files(&scan), vec!["blank.md", "plain.md"]);
        assert_eq!(scan.skipped[0].reason, SkipReason::NoTitle);
    }

    #[test]
    fn index_md_is_skipped_as_reserved() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "index.md", "---\ntitle: Home\n---\nbody");
        write_post(tmp.path(), "a.md", "---\ntitle: A\n---\nbody");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(post_slugs(&scan), vec!["a"]);
        assert_eq!(skipped_files(&scan), vec!["index.md"]);
        assert_eq!(scan.skipped[0].reason, SkipReason::ReservedSlug);
        assert_eq!(
            scan.skipped[0].reason.to_string(),
            "slug \"index\" is reserved for the listing page"
        );
    }

    #[test]
    fn defaults_for_optional_fields() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "bare.md", "---\ntitle: Bare\n---\nShort body.");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let entry = &scan.posts[0].entry;
        assert_eq!(entry.date, "");
        assert_eq!(entry.tags, Vec::<String>::new());
        assert_eq!(entry.excerpt, "Short body....");
        assert_eq!(entry.read_time, "1 min read");
        assert_eq!(scan.posts[0].author, None);
    }

    #[test]
    fn explicit_empty_excerpt_is_kept() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "e.md", "---\ntitle: E\nexcerpt:\n---\nBody here");
        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(scan.posts[0].entry.excerpt, "");
    }

    #[test]
    fn posts_sorted_newest_first_and_stable() {
        let tmp = TempDir::new().unwrap();
        write_post(tmp.path(), "a.md", "---\ntitle: A\ndate: 2024-01-01\n---\n");
        write_post(tmp.path(), "b.md", "---\ntitle: B\ndate: 2025-06-01\n---\n");
        write_post(tmp.path(), "c.md", "---\ntitle: C\ndate: 2024-01-01\n---\n");
        write_post(tmp.path(), "d.md", "---\ntitle: D\n---\n");

        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(post_slugs(&scan), vec!["b", "a", "c", "d"]);
    }

    #[test]
    fn read_time_uses_configured_speed() {
        let tmp = TempDir::new().unwrap();
        let body = "word ".repeat(600);
        write_post(tmp.path(), "long.md", &format!("---\ntitle: Long\n---\n{body}"));

        let mut config = SiteConfig::default();
        let scan_default = scan(tmp.path(), &config).unwrap();
        assert_eq!(scan_default.posts[0].entry.read_time, "3 min read");
        assert_eq!(scan_default.posts[0].word_count, 600);

        config.index.words_per_minute = 100;
        let scan_slow = scan(tmp.path(), &config).unwrap();
        assert_eq!(scan_slow.posts[0].entry.read_time, "6 min read");
    }

    #[test]
    fn read_time_rounds_half_to_even() {
        assert_eq!(read_time_minutes(0, 200), 1);
        assert_eq!(read_time_minutes(50, 200), 1);
        assert_eq!(read_time_minutes(299, 200), 1);
        assert_eq!(read_time_minutes(300, 200), 2);
        assert_eq!(read_time_minutes(500, 200), 2);
        assert_eq!(read_time_minutes(700, 200), 4);
    }

    #[test]
    fn default_excerpt_counts_characters() {
        assert_eq!(default_excerpt("héllo wörld", 5), "héllo...");
        assert_eq!(default_excerpt("ab", 150), "ab...");
    }

    #[test]
    fn write_index_uses_camel_case_fields() {
        let tmp = TempDir::new().unwrap();
        write_post(
            tmp.path(),
            "hello.md",
            "---\ntitle: Hello\ndate: 2025-02-03\ntags: [a, b]\nexcerpt: Hi\n---\nBody",
        );
        let scan = scan(tmp.path(), &SiteConfig::default()).unwrap();
        let path = write_index(tmp.path(), &scan.entries()).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let first = &json[0];
        assert_eq!(first["slug"], "hello");
        assert_eq!(first["title"], "Hello");
        assert_eq!(first["date"], "2025-02-03");
        assert_eq!(first["excerpt"], "Hi");
        assert_eq!(first["tags"], serde_json::json!(["a", "b"]));
        assert_eq!(first["readTime"], "1 min read");
    }

    #[test]
    fn write_index_for_no_posts_is_empty_array() {
        let tmp = TempDir::new().unwrap();
        let path = write_index(tmp.path(), &[]).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }
}
