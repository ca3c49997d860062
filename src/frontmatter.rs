//! Frontmatter parsing for Markdown posts.
//!
//! A post starts with an optional metadata block delimited by `---` lines,
//! followed by the Markdown body:
//!
//! ```text
//! ---
//! title: Hello
//! date: 2025-03-01
//! tags:
//!   - Rust
//!   - Notes
//! ---
//! Body text
//! ```
//!
//! This is not a YAML parser. Every value is a plain string except `tags`,
//! which accepts three spellings:
//!
//! - inline list: `tags: [a, b, c]`
//! - comma list: `tags: a, b`
//! - block list: `tags:` followed by `- a` lines
//!
//! Parsing never fails. A document that opens a block but never closes it is
//! treated as having no metadata at all.

use std::collections::BTreeMap;
use std::fmt::Write as _;

const DELIMITER: &str = "---";
const CLOSING: &str = "\n---";
const TAGS: &str = "tags";

/// A metadata value: plain text, or the `tags` sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    List(Vec<String>),
}

/// Parsed frontmatter fields, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: BTreeMap<String, Value>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Text value for `key`, if present and not a list.
    pub fn text(&self, key: &str) -> Option<&str> {
        match self.fields.get(key) {
            Some(Value::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The `tags` sequence; empty when absent.
    pub fn tags(&self) -> &[String] {
        match self.fields.get(TAGS) {
            Some(Value::List(tags)) => tags,
            _ => &[],
        }
    }

    /// Store a text value. Writing `tags` through here stores a one-item list.
    pub fn set_text(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if key == TAGS {
            self.fields.insert(key, Value::List(split_list(&value)));
        } else {
            self.fields.insert(key, Value::Text(value));
        }
    }

    pub fn set_tags(&mut self, tags: Vec<String>) {
        self.fields.insert(TAGS.to_string(), Value::List(tags));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn push_tag(&mut self, tag: String) {
        match self
            .fields
            .entry(TAGS.to_string())
            .or_insert_with(|| Value::List(Vec::new()))
        {
            Value::List(tags) => tags.push(tag),
            slot => *slot = Value::List(vec![tag]),
        }
    }
}

/// A parsed document: metadata plus the trimmed body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub metadata: Metadata,
    pub body: String,
}

/// Which key `- item` lines currently belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Last key was an ordinary field; `- ` lines are read like any other line.
    Scalar,
    /// Last key was `tags`; list items extend the tag list.
    Tags,
}

/// Split a document into its metadata block and body.
pub fn parse(text: &str) -> Document {
    let text = normalize(text);
    let text = text.trim();

    let Some((block, body)) = split_block(text) else {
        return Document {
            metadata: Metadata::new(),
            body: text.to_string(),
        };
    };

    Document {
        metadata: parse_block(block),
        body: body.trim().to_string(),
    }
}

/// Serialize metadata and body back into a delimited document.
///
/// `tags` is always written in block form so tags containing commas
/// survive a re-parse.
pub fn render(metadata: &Metadata, body: &str) -> String {
    let mut out = String::from(DELIMITER);
    out.push('\n');
    for (key, value) in metadata.iter() {
        match value {
            Value::Text(text) => {
                let _ = writeln!(out, "{key}: {text}");
            }
            Value::List(items) => {
                let _ = writeln!(out, "{key}:");
                for item in items {
                    let _ = writeln!(out, "  - {item}");
                }
            }
        }
    }
    out.push_str(DELIMITER);
    out.push_str("\n\n");
    out.push_str(body.trim());
    out.push('\n');
    out
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Returns `(block, rest)` when `text` opens and closes a metadata block.
fn split_block(text: &str) -> Option<(&str, &str)> {
    if !text.starts_with(DELIMITER) {
        return None;
    }
    let close = text[DELIMITER.len()..].find(CLOSING)? + DELIMITER.len();
    let block = &text[DELIMITER.len()..close];
    let rest = &text[close + CLOSING.len()..];
    Some((block.trim(), rest))
}

fn parse_block(block: &str) -> Metadata {
    let mut metadata = Metadata::new();
    let mut mode = Mode::Scalar;

    for line in block.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if mode == Mode::Tags
            && let Some(item) = line.strip_prefix("- ")
        {
            metadata.push_tag(item.trim().to_string());
            continue;
        }

        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        if key == TAGS {
            mode = Mode::Tags;
            metadata.set_tags(parse_tags_value(value));
        } else {
            mode = Mode::Scalar;
            metadata
                .fields
                .insert(key.to_string(), Value::Text(value.to_string()));
        }
    }

    metadata
}

fn parse_tags_value(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    let inner = value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
        .unwrap_or(value);
    split_list(inner)
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
