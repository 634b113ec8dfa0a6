//! Error types for the notebox node stores and synchronizer.

use std::path::Path;
use thiserror::Error;

/// Errors surfaced by node stores, the synchronizer and the CLI glue.
#[derive(Debug, Error)]
pub enum NoteError {
    #[error("Node does not exist: {0}")]
    NotExists(String),

    #[error("Node already exists: {0}")]
    AlreadyExists(String),

    #[error("Current and new titles are the same: {0}")]
    SameTitles(String),

    #[error("Working directory is empty: {0}")]
    EmptyWorkingDirectory(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Editor `{command}` exited abnormally ({status})")]
    Editor { command: String, status: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NoteError {
    /// Wrap an I/O error with the address it happened at.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        NoteError::Io {
            path: path.as_ref().display().to_string(),
            source,
        }
    }

    /// The listed subtree had nothing eligible in it.
    pub fn is_empty_working_directory(&self) -> bool {
        matches!(self, NoteError::EmptyWorkingDirectory(_))
    }

    pub fn is_not_exists(&self) -> bool {
        matches!(self, NoteError::NotExists(_))
    }
}

impl From<config::ConfigError> for NoteError {
    fn from(err: config::ConfigError) -> Self {
        NoteError::Config(err.to_string())
    }
}

impl From<sled::Error> for NoteError {
    fn from(err: sled::Error) -> Self {
        NoteError::Storage(err.to_string())
    }
}

impl From<bincode::Error> for NoteError {
    fn from(err: bincode::Error) -> Self {
        NoteError::Serialization(err.to_string())
    }
}
