//! Static HTML generation.
//!
//! Stage 2 of the build. Takes the scanned posts and writes a crawlable copy
//! of the blog next to the client-side listing:
//!
//! ```text
//! dist/
//! └── posts/
//!     ├── index.html             # Listing page, newest first
//!     ├── index.json             # Copy of the generated index
//!     ├── hello-world.html       # One page per post
//!     ├── rust-ownership.html
//!     └── images/                # Copied image assets
//! ```
//!
//! ## Post pages
//!
//! Each page carries the metadata search engines and link previews read:
//! `<title>`, description and keywords, Open Graph tags, the publish date,
//! and a canonical link when `site.url` is configured.
//!
//! ## Markdown
//!
//! Bodies are rendered with [pulldown-cmark](https://docs.rs/pulldown-cmark)
//! with the GitHub extensions (tables, strikethrough, task lists, footnotes).
//! Two rewrites happen on the event stream:
//!
//! - Soft line breaks become `<br>`, so a newline in the source is a newline
//!   on the page.
//! - Images become `<figure>` blocks. Relative sources resolve against the
//!   image directory; absolute URLs, root paths and `data:` URIs are kept.
//!
//! HTML is built with [maud](https://maud.lambda.xyz/), so every interpolated
//! title, tag and excerpt is escaped.

use crate::assets::{self, AssetError};
use crate::config::SiteConfig;
use crate::scan::{INDEX_FILENAME, LISTING_SLUG, Scan};
use crate::types::Post;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
    #[error("Post {0:?} would overwrite the listing page")]
    ListingClash(String),
}

/// What the generate stage wrote, relative to the output directory.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Post pages in index order, e.g. `posts/hello-world.html`.
    pub pages: Vec<String>,
    pub listing: String,
    pub index: String,
    /// Copied images, relative to the image directory.
    pub images: Vec<PathBuf>,
}

const CSS: &str = include_str!("../static/style.css");

/// Directory inside the output root that mirrors the posts directory.
const POSTS_OUT: &str = "posts";

pub fn generate(
    scan: &Scan,
    config: &SiteConfig,
    posts_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    if let Some(post) = scan.posts.iter().find(|p| p.entry.slug == LISTING_SLUG) {
        return Err(GenerateError::ListingClash(post.source.display().to_string()));
    }

    let pages_dir = output_dir.join(POSTS_OUT);
    fs::create_dir_all(&pages_dir)?;

    // Rendering is pure per post; only the writes below touch the disk.
    let rendered: Vec<(String, String)> = scan
        .posts
        .par_iter()
        .map(|post| {
            let file = format!("{}.html", post.entry.slug);
            (file, render_post_page(post, config).into_string())
        })
        .collect();

    let mut report = GenerateReport::default();
    for (file, html) in &rendered {
        fs::write(pages_dir.join(file), html)?;
        report.pages.push(format!("{POSTS_OUT}/{file}"));
    }

    let listing = render_listing_page(&scan.posts, config);
    fs::write(pages_dir.join("index.html"), listing.into_string())?;
    report.listing = format!("{POSTS_OUT}/index.html");

    let json = serde_json::to_string_pretty(&scan.entries())?;
    fs::write(pages_dir.join(INDEX_FILENAME), json)?;
    report.index = format!("{POSTS_OUT}/{INDEX_FILENAME}");

    report.images = assets::copy_images(posts_dir, &config.pages.image_dir, output_dir)?;

    Ok(report)
}

// ============================================================================
// Markdown
// ============================================================================

/// Render a Markdown body to HTML.
pub fn render_markdown(body: &str, image_dir: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let events = rewrite_events(Parser::new_ext(body, options), image_dir);
    let mut html = String::with_capacity(body.len() * 3 / 2);
    md_html::push_html(&mut html, events.into_iter());
    html
}

/// An image whose alt text is still being collected.
struct PendingImage {
    src: String,
    title: String,
    alt: String,
    /// Images nested inside this image's alt text.
    depth: usize,
}

fn rewrite_events<'a>(parser: Parser<'a>, image_dir: &str) -> Vec<Event<'a>> {
    let mut events = Vec::new();
    let mut pending: Option<PendingImage> = None;

    for event in parser {
        if let Some(image) = pending.as_mut() {
            let mut closed = false;
            match event {
                Event::Start(Tag::Image { .. }) => image.depth += 1,
                Event::End(TagEnd::Image) if image.depth > 0 => image.depth -= 1,
                Event::End(TagEnd::Image) => closed = true,
                Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
                _ => {}
            }
            if closed && let Some(image) = pending.take() {
                let markup = render_figure(&image, image_dir).into_string();
                events.push(Event::InlineHtml(markup.into()));
            }
            continue;
        }

        match event {
            Event::Start(Tag::Image {
                dest_url, title, ..
            }) => {
                pending = Some(PendingImage {
                    src: dest_url.to_string(),
                    title: title.to_string(),
                    alt: String::new(),
                    depth: 0,
                });
            }
            Event::SoftBreak => events.push(Event::HardBreak),
            other => events.push(other),
        }
    }

    events
}

fn render_figure(image: &PendingImage, image_dir: &str) -> Markup {
    let src = resolve_image_src(&image.src, image_dir);
    let title = (!image.title.is_empty()).then_some(image.title.as_str());
    html! {
        figure {
            img src=(src) alt=(image.alt) title=[title] loading="lazy";
            @if !image.alt.is_empty() {
                figcaption { (image.alt) }
            }
        }
    }
}

/// Resolve a Markdown image source against the image directory.
///
/// - `diagram.png` → `images/diagram.png`
/// - `images/diagram.png` → unchanged (already resolved)
/// - `https://…`, `/static/x.png`, `data:…` → unchanged
pub fn resolve_image_src(src: &str, image_dir: &str) -> String {
    let image_dir = image_dir.trim_end_matches('/');
    let is_external = src.is_empty()
        || src.starts_with("http://")
        || src.starts_with("https://")
        || src.starts_with('/')
        || src.starts_with("data:");
    let already_resolved = src
        .strip_prefix(image_dir)
        .is_some_and(|rest| rest.starts_with('/'));

    if is_external || already_resolved {
        src.to_string()
    } else {
        format!("{image_dir}/{src}")
    }
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure.
fn base_document(title: &str, extra_head: Markup, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                (extra_head)
                style { (PreEscaped(CSS)) }
            }
            body {
                (content)
            }
        }
    }
}

/// Renders the site header with a breadcrumb back to the listing.
fn site_header(breadcrumb: Markup) -> Markup {
    html! {
        header.site-header {
            nav.breadcrumb {
                (breadcrumb)
            }
        }
    }
}

fn post_author<'a>(post: &'a Post, config: &'a SiteConfig) -> Option<&'a str> {
    post.author
        .as_deref()
        .or_else(|| (!config.site.author.is_empty()).then_some(config.site.author.as_str()))
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders a single post page.
fn render_post_page(post: &Post, config: &SiteConfig) -> Markup {
    let entry = &post.entry;
    let body_html = render_markdown(&post.body, &config.pages.image_dir);
    let page_title = format!("{} \u{2014} {}", entry.title, config.site.title);
    let canonical = config
        .base_url()
        .map(|url| format!("{url}/{POSTS_OUT}/{}.html", entry.slug));
    let author = post_author(post, config);

    let head = html! {
        meta name="description" content=(entry.excerpt);
        @if !entry.tags.is_empty() {
            meta name="keywords" content=(entry.tags.join(", "));
        }
        @if let Some(author) = author {
            meta name="author" content=(author);
        }
        meta property="og:title" content=(entry.title);
        meta property="og:description" content=(entry.excerpt);
        meta property="og:type" content="article";
        meta property="og:site_name" content=(config.site.title);
        @if let Some(url) = &canonical {
            meta property="og:url" content=(url);
            link rel="canonical" href=(url);
        }
        @if !entry.date.is_empty() {
            meta property="article:published_time" content=(entry.date);
        }
        @for tag in &entry.tags {
            meta property="article:tag" content=(tag);
        }
    };

    let breadcrumb = html! {
        a href="index.html" { (config.site.title) }
        " \u{203a} "
        (entry.title)
    };

    let content = html! {
        (site_header(breadcrumb))
        main.post-page {
            article.post {
                header.post-header {
                    h1.post-title { (entry.title) }
                    p.post-meta {
                        @if !entry.date.is_empty() {
                            time datetime=(entry.date) { (entry.date) }
                        }
                        @if let Some(author) = author {
                            span.post-author { "by " (author) }
                        }
                        span.post-reading-time {
                            (post.read_minutes) " min read \u{2022} " (post.word_count) " words"
                        }
                    }
                    @if !entry.tags.is_empty() {
                        div.post-tags {
                            @for tag in &entry.tags {
                                span.blog-tag { (tag) }
                            }
                        }
                    }
                }
                div.post-body {
                    (PreEscaped(body_html))
                }
            }
        }
    };

    base_document(&page_title, head, content)
}

/// Renders the listing page with one card per post.
fn render_listing_page(posts: &[Post], config: &SiteConfig) -> Markup {
    let canonical = config.base_url().map(|url| format!("{url}/{POSTS_OUT}/"));
    let description = format!("All posts on {}", config.site.title);

    let head = html! {
        meta name="description" content=(description);
        meta property="og:title" content=(config.site.title);
        meta property="og:type" content="website";
        @if let Some(url) = &canonical {
            meta property="og:url" content=(url);
            link rel="canonical" href=(url);
        }
    };

    let breadcrumb = html! {
        a href="index.html" { (config.site.title) }
    };

    let content = html! {
        (site_header(breadcrumb))
        main.listing-page {
            h1 { (config.site.title) }
            @if posts.is_empty() {
                div.blog-empty { "No posts yet. Check back soon." }
            } @else {
                div.blog-list {
                    @for post in posts {
                        a.blog-card href={ (post.entry.slug) ".html" } {
                            @if !post.entry.date.is_empty() {
                                span.blog-card-date { (post.entry.date) }
                            }
                            span.blog-card-title { (post.entry.title) }
                            span.blog-card-excerpt { (post.entry.excerpt) }
                            @if !post.entry.tags.is_empty() {
                                div.blog-card-tags {
                                    @for tag in &post.entry.tags {
                                        span.blog-tag { (tag) }
                                    }
                                }
                            }
                            span.blog-card-read { (post.entry.read_time) }
                        }
                    }
                }
            }
        }
    };

    base_document(&config.site.title, head, content)
}

// ============================================================================
// Tests
// ============================================================================
