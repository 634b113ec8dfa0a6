//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::NoteError;

/// Map store and sync errors to a string for CLI output.
pub fn map_error(e: &NoteError) -> String {
    match e {
        NoteError::EmptyWorkingDirectory(_) => "No notes found.".to_string(),
        NoteError::SameTitles(title) => {
            format!("Nothing to do: '{}' already has that title", title)
        }
        _ => format!("Error: {}", e),
    }
}
