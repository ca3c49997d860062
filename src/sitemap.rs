//! Sitemap generation.
//!
//! Lists the post listing page and every post page for search engines:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
//!   <url>
//!     <loc>https://example.com/posts/hello-world.html</loc>
//!     <lastmod>2025-01-15</lastmod>
//!   </url>
//! </urlset>
//! ```
//!
//! Sitemap URLs must be absolute, so nothing is written without `site.url`.

use crate::types::IndexEntry;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// File name of the sitemap in the output root.
pub const SITEMAP_FILENAME: &str = "sitemap.xml";

/// Single `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
struct UrlEntry {
    loc: String,
    lastmod: Option<String>,
}

/// Render the sitemap XML for the listing page and all posts.
pub fn build_sitemap(entries: &[IndexEntry], site_url: &str) -> String {
    let base = site_url.trim_end_matches('/');

    let newest = entries.iter().filter_map(|e| lastmod(&e.date)).max();
    let mut urls = vec![UrlEntry {
        loc: format!("{base}/posts/"),
        lastmod: newest,
    }];
    urls.extend(entries.iter().map(|entry| UrlEntry {
        loc: format!("{base}/posts/{}.html", entry.slug),
        lastmod: lastmod(&entry.date),
    }));

    let mut xml = String::with_capacity(128 + urls.len() * 96);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<urlset xmlns="{SITEMAP_NS}">"#));
    xml.push('\n');
    for url in urls {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&url.loc)));
        if let Some(lastmod) = url.lastmod {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}

/// Write `sitemap.xml` into the output root and return its path.
pub fn write_sitemap(output_dir: &Path, xml: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(SITEMAP_FILENAME);
    fs::write(&path, xml)?;
    Ok(path)
}

/// `YYYY-MM-DD` prefix of a post date, if it is a real calendar date.
///
/// Accepts full timestamps (`2025-01-15T09:30:00Z`) by looking only at the
/// date part.
fn lastmod(date: &str) -> Option<String> {
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|d| d.format("%Y-%m-%d").to_string())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
