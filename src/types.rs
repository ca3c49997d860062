//! Shared types passed between the scan, generate and sitemap stages.
//!
//! [`IndexEntry`] is the on-disk shape of `index.json`, the file the
//! client-side blog listing fetches. Its field names are part of that
//! contract, hence the camelCase rename.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One post as listed in `index.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    /// File stem of the source `.md` file.
    pub slug: String,
    pub title: String,
    /// Raw `date` value, ISO-8601 expected. Empty when unset.
    pub date: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    /// Display string, e.g. `"3 min read"`.
    pub read_time: String,
}

/// A scanned post: its index entry plus what page rendering needs.
#[derive(Debug, Clone)]
pub struct Post {
    pub entry: IndexEntry,
    /// Markdown body with the frontmatter removed.
    pub body: String,
    pub author: Option<String>,
    pub word_count: usize,
    pub read_minutes: u32,
    /// Path of the source file.
    pub source: PathBuf,
}
