//! Project configuration module.
//!
//! Handles loading and validating `blog.toml`. The file lives at the
//! project root and is optional: stock defaults cover every key, and a user
//! file only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! posts_dir = "posts"       # Markdown sources, images/ and index.json
//! output_dir = "dist"       # Where `build` writes the static site
//!
//! [site]
//! title = "Blog"            # Appended to every page <title>
//! url = ""                  # Absolute base URL (sitemap, canonical links)
//! author = ""               # Default author for new posts
//!
//! [index]
//! words_per_minute = 200    # Reading speed for the read-time estimate
//! excerpt_length = 150      # Body characters used when a post has no excerpt
//!
//! [pages]
//! image_dir = "images"      # Image directory inside posts_dir
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path};
use thiserror::Error;

/// File name of the project config, relative to the project root.
pub const CONFIG_FILENAME: &str = "blog.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `blog.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Directory holding the Markdown posts, relative to the project root.
    pub posts_dir: String,
    /// Directory the static site is written to, relative to the project root.
    pub output_dir: String,
    /// Site identity used in page heads and the sitemap.
    pub site: SiteInfo,
    /// Index generation settings.
    pub index: IndexConfig,
    /// Page rendering settings.
    pub pages: PagesConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            posts_dir: "posts".to_string(),
            output_dir: "dist".to_string(),
            site: SiteInfo::default(),
            index: IndexConfig::default(),
            pages: PagesConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Drop trailing slashes from `pages.image_dir` so `images/` and `images`
    /// resolve the same image paths.
    pub fn normalize(&mut self) {
        let trimmed = self.pages.image_dir.trim_end_matches('/');
        if trimmed.len() != self.pages.image_dir.len() {
            self.pages.image_dir = trimmed.to_string();
        }
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index.words_per_minute == 0 {
            return Err(ConfigError::Validation(
                "index.words_per_minute must be greater than 0".into(),
            ));
        }
        if self.index.excerpt_length == 0 {
            return Err(ConfigError::Validation(
                "index.excerpt_length must be greater than 0".into(),
            ));
        }
        let url = &self.site.url;
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Validation(format!(
                "site.url must start with http:// or https:// (got {url:?})"
            )));
        }
        if !is_plain_relative(&self.pages.image_dir) {
            return Err(ConfigError::Validation(
                "pages.image_dir must be a non-empty relative path".into(),
            ));
        }
        Ok(())
    }

    /// Site URL without a trailing slash, or `None` when unset.
    pub fn base_url(&self) -> Option<&str> {
        let url = self.site.url.trim_end_matches('/');
        (!url.is_empty()).then_some(url)
    }
}

fn is_plain_relative(path: &str) -> bool {
    !path.is_empty()
        && Path::new(path)
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Site identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteInfo {
    /// Site name, appended to page titles (`Post — Blog`).
    pub title: String,
    /// Absolute base URL, e.g. `https://example.com`. Empty disables the sitemap.
    pub url: String,
    /// Default author written into new posts.
    pub author: String,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            url: String::new(),
            author: String::new(),
        }
    }
}

/// Index generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Words per minute used to estimate read time.
    pub words_per_minute: u32,
    /// Number of body characters used as a fallback excerpt.
    pub excerpt_length: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            words_per_minute: 200,
            excerpt_length: 150,
        }
    }
}

/// Page rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PagesConfig {
    /// Image directory inside `posts_dir`; relative Markdown image paths resolve here.
    pub image_dir: String,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            image_dir: "images".to_string(),
        }
    }
}

// =============================================================================
// Config loading and validation
// =============================================================================

/// Parse `blog.toml` content, normalize it, then validate.
///
/// Every struct carries `#[serde(default)]`, so missing keys take the stock
/// defaults and an empty string yields [`SiteConfig::default`].
pub fn parse_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let mut config: SiteConfig = toml::from_str(content)?;
    config.normalize();
    config.validate()?;
    Ok(config)
}

/// Load config from `blog.toml` in the project root, or defaults when absent.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join(CONFIG_FILENAME);
    if !config_path.exists() {
        return parse_config("");
    }
    let content = fs::read_to_string(&config_path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock `blog.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Postmill Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Directory with the Markdown posts. index.json is written here and
# images are read from <posts_dir>/<pages.image_dir>.
posts_dir = "posts"

# Where `postmill build` writes the static site.
output_dir = "dist"

# ---------------------------------------------------------------------------
# Site identity
# ---------------------------------------------------------------------------
[site]
# Appended to every page title: "My Post — Blog".
title = "Blog"

# Absolute base URL, e.g. "https://example.com".
# Needed for sitemap.xml and canonical links; leave empty to skip both.
url = ""

# Default author for posts created with `postmill new`.
author = ""

# ---------------------------------------------------------------------------
# Index generation
# ---------------------------------------------------------------------------
[index]
# Reading speed used for the "N min read" estimate.
words_per_minute = 200

# Body characters used as an excerpt when a post does not set one.
excerpt_length = 150

# ---------------------------------------------------------------------------
# Page rendering
# ---------------------------------------------------------------------------
[pages]
# Directory inside posts_dir holding images. Relative image links in
# Markdown resolve against it.
image_dir = "images"
"##
}
