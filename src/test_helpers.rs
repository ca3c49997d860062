//! Shared test utilities for the postmill test suite.
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let scan = scan(&posts_dir(&tmp), &SiteConfig::default()).unwrap();
//!
//! let post = find_post(&scan, "hello-world");
//! assert_eq!(post.entry.title, "Hello, World");
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::scan::Scan;
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` (a project root with `blog.toml` and `posts/`) to a temp
/// directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

/// The `posts/` directory inside a fixture project.
pub fn posts_dir(tmp: &TempDir) -> PathBuf {
    tmp.path().join("posts")
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Scan lookups, panicking with a clear message on a miss
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(scan: &'a Scan, slug: &str) -> &'a Post {
    scan.posts
        .iter()
        .find(|p| p.entry.slug == slug)
        .unwrap_or_else(|| {
            let slugs = post_slugs(scan);
            panic!("post '{slug}' not found. Available: {slugs:?}")
        })
}

/// All post slugs in index order.
pub fn post_slugs(scan: &Scan) -> Vec<&str> {
    scan.posts.iter().map(|p| p.entry.slug.as_str()).collect()
}

/// File names of skipped documents.
pub fn skipped_files(scan: &Scan) -> Vec<&str> {
    scan.skipped.iter().map(|s| s.file.as_str()).collect()
}
