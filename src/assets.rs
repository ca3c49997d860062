//! Image asset copying.
//!
//! Posts reference images relative to `<posts_dir>/<image_dir>`. The build
//! mirrors that directory into `<output>/posts/<image_dir>` so the rendered
//! pages, which live in `<output>/posts/`, resolve the same relative paths.
//!
//! Hidden files and directories (`.DS_Store`, `.git`) are not copied.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// Copy `<posts_dir>/<image_dir>` into `<output_dir>/posts/<image_dir>`.
///
/// Returns the copied files relative to the image directory, in walk order.
/// A missing image directory copies nothing.
pub fn copy_images(
    posts_dir: &Path,
    image_dir: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>, AssetError> {
    let src_root = posts_dir.join(image_dir);
    if !src_root.is_dir() {
        return Ok(Vec::new());
    }
    let dst_root = output_dir.join("posts").join(image_dir);

    let mut copied = Vec::new();
    let walker = WalkDir::new(&src_root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(&src_root)
            .unwrap_or(entry.path())
            .to_path_buf();
        let dst = dst_root.join(&rel);
        if let Some(parent) = dst.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(entry.path(), &dst)?;
        copied.push(rel);
    }

    Ok(copied)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
