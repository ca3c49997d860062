//! # Postmill
//!
//! A small blog engine for a directory of Markdown posts. Each post carries a
//! frontmatter block with its title, date, tags and excerpt; Postmill turns
//! the directory into the `index.json` a client-side listing fetches, and
//! optionally into a static HTML copy of the blog.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      posts/*.md  →  posts/index.json   (frontmatter → index entries)
//! 2. Generate  scanned     →  dist/posts/        (HTML pages, images, sitemap)
//! ```
//!
//! The scan stage is all that `postmill index` needs. `postmill build` runs
//! both stages in one process and hands the scanned posts straight to the
//! generator.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`frontmatter`] | Frontmatter block parser and renderer |
//! | [`scan`] | Stage 1: reads posts, builds and writes `index.json` |
//! | [`generate`] | Stage 2: renders post pages and the listing with Maud |
//! | [`assets`] | Copies the image directory into the output |
//! | [`sitemap`] | `sitemap.xml` for the generated pages |
//! | [`manage`] | Authoring helpers: new posts, slug-based renames |
//! | [`slug`] | Title → URL slug |
//! | [`config`] | `blog.toml` loading and validation |
//! | [`types`] | Shared types (`IndexEntry`, `Post`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## A Forgiving Frontmatter Parser
//!
//! Posts are written by hand. The [`frontmatter`] parser never fails: an
//! unclosed block, a line without a colon or a stray list item is dropped
//! and the rest of the document still parses. The only hard requirement is a
//! `title`, and a post without one is reported and left out of the index
//! rather than failing the build.
//!
//! ## Maud Over Template Files
//!
//! Pages are built with [Maud](https://maud.lambda.xyz/), so there is no
//! template directory to ship and every interpolated value is escaped.

pub mod assets;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod manage;
pub mod output;
pub mod scan;
pub mod sitemap;
pub mod slug;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
