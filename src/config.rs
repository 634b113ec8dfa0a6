//! Configuration System
//!
//! Bootstrap configuration for the CLI: where the notes root lives, extra
//! reserved titles, and logging. Per-store settings (editor, remote) live in
//! the store itself; see [`crate::settings`].

use crate::error::NoteError;
use crate::ignore::IgnoreSet;
use crate::logging::LoggingConfig;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Directory name of the default notes root inside the home directory
const DEFAULT_ROOT_DIR: &str = ".notebox";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteboxConfig {
    /// Notes root (defaults to ~/.notebox)
    pub root: Option<PathBuf>,

    /// Extra titles excluded from listing and sync
    pub ignore: Vec<String>,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl NoteboxConfig {
    /// Configured notes root, or the default under the home directory.
    pub fn notes_root(&self) -> Result<PathBuf, NoteError> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => default_notes_root(),
        }
    }

    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::with_extra(&self.ignore)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), NoteError> {
        if let Some(root) = &self.root {
            if root.as_os_str().is_empty() {
                return Err(NoteError::Config("root cannot be empty".to_string()));
            }
        }
        self.logging.validate()
    }
}

/// `<home>/.notebox`
pub fn default_notes_root() -> Result<PathBuf, NoteError> {
    UserDirs::new()
        .map(|dirs| dirs.home_dir().join(DEFAULT_ROOT_DIR))
        .ok_or_else(|| NoteError::Config("Could not determine home directory".to_string()))
}
