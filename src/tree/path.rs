//! Title normalization and path resolution
//!
//! Titles are store-relative, `/`-separated and NFC-normalized. Resolving a
//! title against a root always yields exactly one separator between segments;
//! an empty title resolves to the root itself.

use crate::error::NoteError;
use std::path::{Component, Path, PathBuf};
use unicode_normalization::UnicodeNormalization;

/// Normalize a title: NFC, `/` separators, no empty, leading or trailing
/// segments. `.` and `..` segments are rejected so a title can never escape
/// its store root.
pub fn normalize_title(title: &str) -> Result<String, NoteError> {
    let normalized: String = title.nfc().collect();

    let mut segments = Vec::new();
    for segment in normalized.split(['/', '\\']) {
        match segment {
            "" => continue,
            "." | ".." => {
                return Err(NoteError::InvalidPath(format!(
                    "title may not contain '{}' segments: {}",
                    segment, title
                )))
            }
            s => segments.push(s),
        }
    }

    Ok(segments.join("/"))
}

/// Resolve `title` against a string root. Used by stores whose addresses
/// are not filesystem paths.
pub fn resolve(root: &str, title: &str) -> Result<String, NoteError> {
    let title = normalize_title(title)?;
    let root = normalize_root(root);

    if title.is_empty() {
        return Ok(root);
    }
    if root.is_empty() {
        return Ok(title);
    }
    if root == "/" {
        return Ok(format!("/{}", title));
    }
    Ok(format!("{}/{}", root, title))
}

/// Resolve `title` against a filesystem root.
pub fn resolve_path(root: &Path, title: &str) -> Result<PathBuf, NoteError> {
    let title = normalize_title(title)?;
    if title.is_empty() {
        return Ok(root.to_path_buf());
    }
    Ok(root.join(title))
}

/// Title of `path` relative to `root`; the inverse of [`resolve_path`].
pub fn relative_title(root: &Path, path: &Path) -> Result<String, NoteError> {
    let relative = path.strip_prefix(root).map_err(|_| {
        NoteError::InvalidPath(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(name) => match name.to_str() {
                Some(name) => segments.push(name),
                None => {
                    return Err(NoteError::InvalidPath(format!(
                        "{} is not valid UTF-8",
                        path.display()
                    )))
                }
            },
            Component::CurDir => continue,
            other => {
                return Err(NoteError::InvalidPath(format!(
                    "unexpected component {:?} in {}",
                    other,
                    path.display()
                )))
            }
        }
    }

    normalize_title(&segments.join("/"))
}

/// Title of the directory containing `title`; empty at the top level.
pub fn parent_title(title: &str) -> &str {
    title.rsplit_once('/').map(|(parent, _)| parent).unwrap_or("")
}

/// Titles of every directory above `title`, shallowest first.
pub fn ancestor_titles(title: &str) -> Vec<String> {
    let mut ancestors = Vec::new();
    let mut current = parent_title(title);
    while !current.is_empty() {
        ancestors.push(current.to_string());
        current = parent_title(current);
    }
    ancestors.reverse();
    ancestors
}

fn normalize_root(root: &str) -> String {
    let trimmed = root.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() && !root.is_empty() {
        return "/".to_string();
    }
    trimmed.to_string()
}
