//! Node stores
//!
//! A store is any backend that can hold a tree of notes and folders under a
//! root. Every store implements [`NodeStore`]; the synchronizer is written
//! against the trait only, so local/local, local/sled and sled/sled pairs all
//! share the same logic.

pub mod local;
pub mod sled_store;

pub use local::LocalStore;
pub use sled_store::SledStore;

use crate::error::NoteError;
use crate::ignore::IgnoreSet;
use crate::node::{EditNode, Listing, Node, NodeKind, StoreKind};
use crate::settings::Settings;
use tracing::{debug, warn};

/// Node store interface
pub trait NodeStore {
    /// Backend identifier used to key [`Node::path`].
    fn kind(&self) -> StoreKind;

    /// Display form of the store root.
    fn root(&self) -> String;

    /// Reserved titles this store never lists, syncs or clears.
    fn reserved(&self) -> &IgnoreSet;

    /// Create the root container and default settings. Idempotent.
    fn init(&self) -> Result<(), NoteError>;

    fn settings(&self) -> Result<Settings, NoteError>;

    /// Persist settings; fails with `InvalidSettings` when they do not validate.
    fn write_settings(&self, settings: &Settings) -> Result<(), NoteError>;

    /// Whether `node` resolves to something in this store. The root always exists.
    fn is_node_exists(&self, node: &Node) -> Result<bool, NoteError>;

    /// Hand the node to the configured editor.
    fn open(&self, node: &Node) -> Result<(), NoteError>;

    fn create(&self, note: &Node) -> Result<Node, NoteError>;

    /// Read a node back with its body populated.
    fn view(&self, note: &Node) -> Result<Node, NoteError>;

    /// Overwrite the body of an existing note. Never creates.
    fn edit(&self, note: &Node) -> Result<Node, NoteError>;

    /// Remove a node; directories are emptied deepest-first before removal.
    fn remove(&self, node: &Node) -> Result<(), NoteError>;

    fn rename(&self, edit: &EditNode) -> Result<(), NoteError>;

    fn mkdir(&self, folder: &Node) -> Result<Node, NoteError>;

    /// Enumerate the entire subtree under `subpath`.
    ///
    /// Titles matching `ignore` are skipped, as are nodes of another kind
    /// when `kind` is given. File bodies are preloaded. Fails with
    /// `EmptyWorkingDirectory` when nothing eligible is found.
    fn get_all(
        &self,
        subpath: &str,
        kind: Option<NodeKind>,
        ignore: &IgnoreSet,
    ) -> Result<Listing, NoteError>;

    /// Remove every non-reserved node, continuing past failures.
    fn clear_nodes(&self) -> (Vec<Node>, Vec<NoteError>) {
        clear_all(self, self.reserved())
    }
}

/// Remove `descendants` deepest-first, then nothing else.
///
/// Descendants are ordered by title length, longest first: a child's title
/// is always its parent's title plus a suffix, so every child goes before
/// its parent. The first failure stops the walk and is returned; anything
/// not yet processed stays in place.
pub fn remove_in_order<F>(mut descendants: Vec<Node>, mut remove_one: F) -> Result<(), NoteError>
where
    F: FnMut(&Node) -> Result<(), NoteError>,
{
    descendants.sort_by(|a, b| {
        b.title
            .len()
            .cmp(&a.title.len())
            .then_with(|| b.title.cmp(&a.title))
    });

    for node in &descendants {
        debug!(title = %node.title, kind = %node.kind, "Removing descendant");
        remove_one(node)?;
    }

    Ok(())
}

/// Shared `clear_nodes` behavior: list everything not reserved, remove it
/// deepest-first, and collect per-node failures without stopping.
///
/// Bodies are not needed to remove a node, so unreadable entries are cleared
/// like any other. Once a node fails, its ancestors are left in place rather
/// than retried, so each failure is reported once.
pub fn clear_all<S>(store: &S, ignore: &IgnoreSet) -> (Vec<Node>, Vec<NoteError>)
where
    S: NodeStore + ?Sized,
{
    let listing = match store.get_all("", None, ignore) {
        Ok(listing) => listing,
        Err(e) if e.is_empty_working_directory() => return (Vec::new(), Vec::new()),
        Err(e) => return (Vec::new(), vec![e]),
    };

    let mut nodes = listing.nodes;
    nodes.extend(listing.unreadable.into_iter().map(|(node, _)| node));
    nodes.sort_by(|a, b| b.title.len().cmp(&a.title.len()));

    let mut removed = Vec::new();
    let mut errors = Vec::new();
    let mut failed: Vec<String> = Vec::new();
    for node in nodes {
        let prefix = format!("{}/", node.title);
        if failed.iter().any(|title| title.starts_with(&prefix)) {
            debug!(title = %node.title, "Keeping ancestor of a node that failed to clear");
            continue;
        }
        match store.remove(&node) {
            Ok(()) => removed.push(node),
            Err(e) => {
                warn!(store = %store.kind(), title = %node.title, error = %e, "Failed to clear node");
                failed.push(node.title);
                errors.push(e);
            }
        }
    }

    (removed, errors)
}
