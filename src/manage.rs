//! Authoring commands: creating posts and renaming them to match their titles.
//!
//! ## `new`
//!
//! Writes `<posts_dir>/<slug>.md` from a starter template. The slug comes
//! from the title via [`make_slug`], and an existing file is never
//! overwritten.
//!
//! ## `slugify`
//!
//! Post slugs are file names, so a post saved as `Untitled (3).md` is served
//! as `Untitled (3).html`. [`plan_renames`] works out the file name each post
//! should have from its title; [`apply_renames`] performs the plan. Planning
//! and applying are split so the CLI can show a dry run first.

use crate::frontmatter;
use crate::scan::{self, ScanError};
use crate::slug::{make_slug, strip_quotes};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("File already exists: {0}")]
    Exists(PathBuf),
    #[error("Title {0:?} does not produce a usable slug")]
    EmptySlug(String),
}

// ============================================================================
// new
// ============================================================================

/// Create a new post from the starter template and return its path.
pub fn new_post(
    posts_dir: &Path,
    title: &str,
    author: &str,
    date: NaiveDate,
) -> Result<PathBuf, ManageError> {
    let slug = make_slug(title);
    if slug.is_empty() {
        return Err(ManageError::EmptySlug(title.to_string()));
    }

    fs::create_dir_all(posts_dir)?;
    let path = posts_dir.join(format!("{slug}.md"));
    if path.exists() {
        return Err(ManageError::Exists(path));
    }

    fs::write(&path, post_template(title.trim(), author.trim(), date))?;
    Ok(path)
}

fn post_template(title: &str, author: &str, date: NaiveDate) -> String {
    let author_line = if author.is_empty() {
        String::new()
    } else {
        format!("author: {author}\n")
    };
    format!(
        "---\n\
         title: {title}\n\
         date: {date}\n\
         {author_line}\
         excerpt: Short description of the post.\n\
         tags:\n  - Tech\n\
         ---\n\
         \n\
         Write your content here...\n",
        date = date.format("%Y-%m-%d"),
    )
}

// ============================================================================
// slugify
// ============================================================================

/// What `slugify` will do with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    /// File name already matches the title.
    Unchanged,
    /// File will be renamed to `target`.
    Rename,
    /// No title in the frontmatter; file is left alone.
    NoTitle,
    /// Title produces no slug characters; file is left alone.
    EmptySlug,
    /// Another file already has the target name; file is left alone.
    Conflict,
}

/// Planned rename for one post file (names are bare file names).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub file: String,
    pub target: Option<String>,
    pub status: RenameStatus,
}

/// Work out the target name of every post in `posts_dir`.
pub fn plan_renames(posts_dir: &Path) -> Result<Vec<Rename>, ManageError> {
    let files = scan::markdown_files(posts_dir)?;
    let mut plans = Vec::with_capacity(files.len());
    let mut claimed: Vec<String> = Vec::new();

    for path in &files {
        let file = file_name(path);
        let content = fs::read_to_string(path)?;
        let doc = frontmatter::parse(&content);

        let Some(title) = doc.metadata.text("title").map(strip_quotes).filter(|t| !t.is_empty())
        else {
            plans.push(Rename {
                file,
                target: None,
                status: RenameStatus::NoTitle,
            });
            continue;
        };

        let slug = make_slug(title);
        if slug.is_empty() {
            plans.push(Rename {
                file,
                target: None,
                status: RenameStatus::EmptySlug,
            });
            continue;
        }

        let target = format!("{slug}.md");
        let status = if target == file {
            RenameStatus::Unchanged
        } else if posts_dir.join(&target).exists() || claimed.contains(&target) {
            RenameStatus::Conflict
        } else {
            claimed.push(target.clone());
            RenameStatus::Rename
        };
        plans.push(Rename {
            file,
            target: Some(target),
            status,
        });
    }

    Ok(plans)
}

/// Perform the `Rename` entries of a plan. Returns the number of files moved.
///
/// With `clean_title`, a `.md` suffix accidentally left in the title value is
/// removed in the rewritten file. The rest of the file is kept byte for byte.
pub fn apply_renames(
    posts_dir: &Path,
    plans: &[Rename],
    clean_title: bool,
) -> Result<usize, ManageError> {
    let mut moved = 0;
    for plan in plans {
        let (RenameStatus::Rename, Some(target)) = (&plan.status, &plan.target) else {
            continue;
        };
        let from = posts_dir.join(&plan.file);
        let to = posts_dir.join(target);
        if to.exists() {
            return Err(ManageError::Exists(to));
        }

        let content = fs::read_to_string(&from)?;
        let content = if clean_title {
            clean_title_line(&content)
        } else {
            content
        };
        fs::write(&to, content)?;
        fs::remove_file(&from)?;
        moved += 1;
    }
    Ok(moved)
}

/// Strip a trailing `.md` from the `title:` value inside the frontmatter.
///
/// Handles quoted titles (`title: "notes.md"` → `title: "notes"`). Only the
/// first `title:` line of the leading block is touched.
fn clean_title_line(content: &str) -> String {
    let mut in_block = false;
    let mut done = false;
    let mut out = String::with_capacity(content.len());

    for (i, line) in content.split_inclusive('\n').enumerate() {
        let bare = line.trim_end_matches(['\n', '\r']);
        if i == 0 {
            in_block = bare.trim() == "---";
        } else if in_block && bare.starts_with("---") {
            in_block = false;
        } else if in_block && !done && bare.starts_with("title:") {
            done = true;
            out.push_str(&strip_md_from_title(bare));
            out.push_str(&line[bare.len()..]);
            continue;
        }
        out.push_str(line);
    }
    out
}

fn strip_md_from_title(line: &str) -> String {
    let value_end = line.trim_end().len();
    let value = &line[..value_end];
    let (body, quote) = match value.strip_suffix(['"', '\'']) {
        Some(rest) => (rest, &value[rest.len()..]),
        None => (value, ""),
    };
    let len = body.len();
    if len >= 3 && body.is_char_boundary(len - 3) && body[len - 3..].eq_ignore_ascii_case(".md") {
        format!("{}{}{}", &body[..len - 3], quote, &line[value_end..])
    } else {
        line.to_string()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
