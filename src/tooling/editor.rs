//! Editor Integration
//!
//! Launches the user's editor on a resolved node address with the process's
//! standard streams attached. Only the exit status is inspected.

use crate::error::NoteError;
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, error};

/// External editor collaborator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Editor {
    command: String,
}

impl Editor {
    /// Create an editor from a command line such as `vim` or `code --wait`.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Run the editor on `path` and wait for it to exit.
    pub fn launch(&self, path: &Path) -> Result<(), NoteError> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| NoteError::InvalidSettings("editor cannot be empty".to_string()))?;

        debug!(editor = %self.command, path = %path.display(), "Launching editor");

        let status = Command::new(program)
            .args(parts)
            .arg(path)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|e| NoteError::io(program, e))?;

        if !status.success() {
            error!(editor = %self.command, %status, "Editor exited abnormally");
            return Err(NoteError::Editor {
                command: self.command.clone(),
                status: status.to_string(),
            });
        }

        Ok(())
    }
}
