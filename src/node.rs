//! Node model shared by every store.
//!
//! A node is either a note (file) or a folder (directory) addressed by its
//! title relative to a store root. The kind of a node read back from a store
//! always reflects what that store holds; the caller-supplied kind only
//! matters when asking a store to create something.

use crate::error::NoteError;
use crate::tree::path::normalize_title;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    File,
    Directory,
}

impl NodeKind {
    pub fn is_dir(self) -> bool {
        matches!(self, NodeKind::Directory)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::File => write!(f, "file"),
            NodeKind::Directory => write!(f, "dir"),
        }
    }
}

/// Identifier of a store backend, used to key a node's per-store addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Local,
    Sled,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Local => write!(f, "local"),
            StoreKind::Sled => write!(f, "sled"),
        }
    }
}

/// A file or directory entry addressable within one or more stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Title relative to the store root; empty for the root itself
    pub title: String,
    pub kind: NodeKind,
    /// Resolved address of this node per store
    #[serde(default)]
    pub path: BTreeMap<StoreKind, String>,
    /// Note content; empty for directories and for files not yet read
    #[serde(default)]
    pub body: String,
}

impl Node {
    /// A note with the given body.
    pub fn note(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: NodeKind::File,
            path: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// A folder.
    pub fn folder(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind: NodeKind::Directory,
            path: BTreeMap::new(),
            body: String::new(),
        }
    }

    /// The store root.
    pub fn root() -> Self {
        Self::folder("")
    }

    pub fn is_root(&self) -> bool {
        self.title.is_empty()
    }

    pub fn is_dir(&self) -> bool {
        self.kind.is_dir()
    }

    /// Address of this node in the given store, if it has been resolved there.
    pub fn address(&self, store: StoreKind) -> Option<&str> {
        self.path.get(&store).map(String::as_str)
    }

    pub fn with_address(mut self, store: StoreKind, address: impl Into<String>) -> Self {
        self.path.insert(store, address.into());
        self
    }

    /// Copy of this node that carries no body; used when only presence matters.
    pub fn without_body(&self) -> Self {
        Self {
            body: String::new(),
            ..self.clone()
        }
    }
}

/// A current/new pair used for rename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditNode {
    pub current: Node,
    pub new: Node,
}

impl EditNode {
    pub fn new(current: Node, new: Node) -> Self {
        Self { current, new }
    }

    /// Renaming to the same title is an error, not a silent success.
    /// Titles are compared after normalization.
    pub fn validate(&self) -> Result<(), NoteError> {
        let current = normalize_title(&self.current.title)?;
        if current == normalize_title(&self.new.title)? {
            return Err(NoteError::SameTitles(current));
        }
        Ok(())
    }
}

/// Result of listing a subtree: nodes plus their resolved addresses for display.
///
/// Files whose body could not be loaded are kept apart in `unreadable`,
/// without a body, together with the read failure.
#[derive(Debug, Default)]
pub struct Listing {
    pub nodes: Vec<Node>,
    pub paths: Vec<String>,
    pub unreadable: Vec<(Node, NoteError)>,
}

impl Listing {
    pub fn push(&mut self, node: Node, path: String) {
        self.nodes.push(node);
        self.paths.push(path);
    }

    pub fn push_unreadable(&mut self, node: Node, error: NoteError) {
        self.unreadable.push((node, error));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Nothing was found, readable or not.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.unreadable.is_empty()
    }
}
