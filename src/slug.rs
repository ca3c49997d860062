//! Slugs: the filesystem- and URL-safe names posts are stored and served under.
//!
//! A post's slug is its file stem (`hello-world.md` → `hello-world`). The
//! `new` and `slugify` commands derive slugs from titles with [`make_slug`]:
//!
//! - `"Hello, World!"` → `"hello-world"`
//! - `"  Rust  --  Ownership  "` → `"rust-ownership"`
//! - `"notes.md"` → `"notes"` (accidental extension in a title)
//! - `"Café"` → `"caf"` (non-ASCII letters are dropped, not transliterated)

use std::path::Path;

/// Derive a slug from a post title.
pub fn make_slug(title: &str) -> String {
    let lower = title.to_lowercase();
    let lower = strip_md_suffix(&lower);

    let kept: String = lower
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    for c in kept.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    slug.trim_matches('-').to_string()
}

/// Slug of a post file: its stem, e.g. `posts/hello-world.md` → `hello-world`.
pub fn slug_from_filename(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove one optional pair of surrounding quotes from a title.
///
/// The quotes need not match: YAML-ish sources are often half-quoted.
pub fn strip_quotes(title: &str) -> &str {
    let title = title.trim();
    let title = title
        .strip_prefix(['"', '\''])
        .unwrap_or(title);
    title.strip_suffix(['"', '\'']).unwrap_or(title)
}

fn strip_md_suffix(s: &str) -> &str {
    let len = s.len();
    if len >= 3 && s.is_char_boundary(len - 3) && s[len - 3..].eq_ignore_ascii_case(".md") {
        &s[..len - 3]
    } else {
        s
    }
}
