//! Filesystem walker for enumerating a store subtree

use crate::error::NoteError;
use crate::ignore::IgnoreSet;
use crate::tree::path::relative_title;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Filesystem entry types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// A file entry with its path and title relative to the store root
    File { path: PathBuf, title: String },
    /// A directory entry with its path and title relative to the store root
    Directory { path: PathBuf, title: String },
}

impl Entry {
    pub fn path(&self) -> &Path {
        match self {
            Entry::File { path, .. } | Entry::Directory { path, .. } => path,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Entry::File { title, .. } | Entry::Directory { title, .. } => title,
        }
    }
}

/// Filesystem walker
///
/// Walks `start` (a directory inside `store_root`) and reports every entry
/// below it, pruning anything whose title matches the ignore set.
pub struct Walker<'a> {
    store_root: PathBuf,
    start: PathBuf,
    ignore: &'a IgnoreSet,
}

impl<'a> Walker<'a> {
    pub fn new(store_root: PathBuf, start: PathBuf, ignore: &'a IgnoreSet) -> Self {
        Self {
            store_root,
            start,
            ignore,
        }
    }

    /// Walk the subtree and collect all entries
    ///
    /// Returns entries sorted by path for determinism. Symlinks are not
    /// followed and are skipped.
    pub fn walk(&self) -> Result<Vec<Entry>, NoteError> {
        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.start)
            .follow_links(false)
            .min_depth(1)
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry.path()));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| self.start.display().to_string());
                NoteError::Io {
                    path,
                    source: e
                        .into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
                }
            })?;

            let path = entry.path().to_path_buf();
            let title = relative_title(&self.store_root, &path)?;
            let file_type = entry.file_type();

            if file_type.is_file() {
                entries.push(Entry::File { path, title });
            } else if file_type.is_dir() {
                entries.push(Entry::Directory { path, title });
            }
        }

        entries.sort_by(|a, b| a.path().cmp(b.path()));

        Ok(entries)
    }

    fn should_ignore(&self, path: &Path) -> bool {
        match relative_title(&self.store_root, path) {
            Ok(title) => self.ignore.matches(&title),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping entry without a usable title");
                true
            }
        }
    }
}
