//! CLI output formatting for all commands.
//!
//! Output is information-first: each post leads with its position and title,
//! and file names appear as indented `Source:` context lines. Warnings are
//! ordinary output lines prefixed with `Warning:`; nothing here aborts.
//!
//! ## Scan
//!
//! ```text
//! Posts
//! 001 Notes on Rust Ownership (2025-03-10)
//!     Source: rust-ownership.md
//!     Tags: rust, memory
//!     1 min read
//!
//! Skipped
//!     Warning: draft-without-title.md (no title)
//! ```
//!
//! ## Build
//!
//! ```text
//! Listing → posts/index.html
//! 001 posts/rust-ownership.html
//! Images: 2 copied
//! Sitemap → dist/sitemap.xml
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::generate::GenerateReport;
use crate::manage::{Rename, RenameStatus};
use crate::scan::Scan;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Scan / index
// ============================================================================

/// Format the scanned posts and any skipped documents.
pub fn format_scan_output(scan: &Scan) -> Vec<String> {
    let mut lines = vec!["Posts".to_string()];

    if scan.posts.is_empty() {
        lines.push("    (none)".to_string());
    }
    for (i, post) in scan.posts.iter().enumerate() {
        let entry = &post.entry;
        let header = if entry.date.is_empty() {
            format!("{} {}", format_index(i + 1), entry.title)
        } else {
            format!("{} {} ({})", format_index(i + 1), entry.title, entry.date)
        };
        lines.push(header);

        let source = post
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("{}.md", entry.slug));
        lines.push(format!("    Source: {}", source));
        if !entry.tags.is_empty() {
            lines.push(format!("    Tags: {}", entry.tags.join(", ")));
        }
        lines.push(format!("    {}", entry.read_time));
    }

    if !scan.skipped.is_empty() {
        lines.push(String::new());
        lines.push("Skipped".to_string());
        for skipped in &scan.skipped {
            lines.push(format!("    Warning: {} ({})", skipped.file, skipped.reason));
        }
    }

    lines
}

pub fn print_scan_output(scan: &Scan) {
    print_lines(format_scan_output(scan));
}

/// Format the confirmation after writing `index.json`.
pub fn format_index_written(index_path: &Path, count: usize) -> Vec<String> {
    vec![format!(
        "Indexed {} \u{2192} {}",
        plural(count, "post", "posts"),
        index_path.display()
    )]
}

pub fn print_index_written(index_path: &Path, count: usize) {
    print_lines(format_index_written(index_path, count));
}

// ============================================================================
// Build
// ============================================================================

/// Format the pages, index copy and images written by the generate stage.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = vec![format!("Listing \u{2192} {}", report.listing)];
    for (i, page) in report.pages.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), page));
    }
    lines.push(format!("Index \u{2192} {}", report.index));
    lines.push(format!("Images: {} copied", report.images.len()));
    lines.push(format!(
        "Generated {}",
        plural(report.pages.len(), "post page", "post pages")
    ));
    lines
}

pub fn print_generate_output(report: &GenerateReport) {
    print_lines(format_generate_output(report));
}

/// Format the sitemap result; `None` means no site URL was configured.
pub fn format_sitemap_output(sitemap_path: Option<&Path>) -> Vec<String> {
    match sitemap_path {
        Some(path) => vec![format!("Sitemap \u{2192} {}", path.display())],
        None => vec!["Warning: site.url is not set, skipping sitemap.xml".to_string()],
    }
}

pub fn print_sitemap_output(sitemap_path: Option<&Path>) {
    print_lines(format_sitemap_output(sitemap_path));
}

// ============================================================================
// Authoring
// ============================================================================

pub fn format_new_post(path: &Path) -> Vec<String> {
    vec![format!("Created new post: {}", path.display())]
}

pub fn print_new_post(path: &Path) {
    print_lines(format_new_post(path));
}

/// Format a slugify plan. `applied` switches the wording from dry run to done.
pub fn format_rename_plan(plans: &[Rename], applied: bool) -> Vec<String> {
    let mut lines = Vec::new();
    if plans.is_empty() {
        lines.push("No .md files found".to_string());
        return lines;
    }

    lines.push(if applied {
        "Applying renames".to_string()
    } else {
        "Dry run (pass --apply to rename)".to_string()
    });

    let mut renamed = 0;
    let mut skipped = 0;
    for plan in plans {
        let target = plan.target.as_deref().unwrap_or_default();
        match plan.status {
            RenameStatus::Unchanged => lines.push(format!("    OK        {}", plan.file)),
            RenameStatus::Rename => {
                renamed += 1;
                lines.push(format!("    RENAME    {} \u{2192} {}", plan.file, target));
            }
            RenameStatus::NoTitle => {
                skipped += 1;
                lines.push(format!("    SKIP      {} (no title)", plan.file));
            }
            RenameStatus::EmptySlug => {
                skipped += 1;
                lines.push(format!("    SKIP      {} (title has no slug characters)", plan.file));
            }
            RenameStatus::Conflict => {
                skipped += 1;
                lines.push(format!(
                    "    CONFLICT  {} \u{2192} {} already exists",
                    plan.file, target
                ));
            }
        }
    }

    let verb = if applied { "renamed" } else { "would be renamed" };
    lines.push(format!("{renamed} file(s) {verb}, {skipped} skipped"));
    lines
}

pub fn print_rename_plan(plans: &[Rename], applied: bool) {
    print_lines(format_rename_plan(plans, applied));
}
