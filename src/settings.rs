//! Per-store settings persisted as a reserved node at the store root.

use crate::error::NoteError;
use crate::node::StoreKind;
use serde::{Deserialize, Serialize};

/// Title of the reserved settings node. Never listed or synced.
pub const SETTINGS_TITLE: &str = ".notebox.toml";

const FALLBACK_EDITOR: &str = "vi";

/// Settings read on every store initialization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Editor command used by `open`; may carry arguments (`code --wait`)
    pub editor: String,

    /// Root directory for notes; overrides the bootstrap root when it differs
    pub notes_root: String,

    /// Optional mirror store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSettings>,
}

/// Location of the remote backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSettings {
    #[serde(default = "default_backend")]
    pub backend: StoreKind,
    pub location: String,
}

fn default_backend() -> StoreKind {
    StoreKind::Sled
}

impl Settings {
    /// Defaults for a fresh store rooted at `root`.
    pub fn default_for(root: impl Into<String>) -> Self {
        Self {
            editor: default_editor(),
            notes_root: root.into(),
            remote: None,
        }
    }

    pub fn validate(&self) -> Result<(), NoteError> {
        if self.editor.trim().is_empty() {
            return Err(NoteError::InvalidSettings("editor cannot be empty".to_string()));
        }
        if self.notes_root.trim().is_empty() {
            return Err(NoteError::InvalidSettings(
                "notes root cannot be empty".to_string(),
            ));
        }
        if let Some(remote) = &self.remote {
            if remote.location.trim().is_empty() {
                return Err(NoteError::InvalidSettings(
                    "remote location cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, NoteError> {
        toml::to_string_pretty(self).map_err(|e| NoteError::Serialization(e.to_string()))
    }

    pub fn from_toml(body: &str) -> Result<Self, NoteError> {
        toml::from_str(body).map_err(|e| NoteError::Serialization(e.to_string()))
    }
}

fn default_editor() -> String {
    ["VISUAL", "EDITOR"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_EDITOR.to_string())
}
