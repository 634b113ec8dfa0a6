//! Cross-store synchronization: fetch, push and migrate.
//!
//! All three work only through [`NodeStore`], so any pair of stores can be
//! synchronized. Nodes are applied strictly one at a time in ascending
//! title-length order, which puts every directory before anything inside it.
//! A failing node is recorded and the run moves on to the next one.
//!
//! Bodies are compared byte for byte with no line-ending normalization; any
//! difference rewrites the whole body on the receiving side.

use crate::error::NoteError;
use crate::node::{Node, NodeKind};
use crate::store::NodeStore;
use tracing::{debug, info, warn};

/// Outcome of a fetch or push
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Nodes created or updated on the receiving store, in application order
    pub nodes: Vec<Node>,
    /// Per-node failures; none of them stopped the run
    pub errors: Vec<NoteError>,
}

impl SyncReport {
    /// Check that nothing failed
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of nodes created or updated
    pub fn count(&self) -> usize {
        self.nodes.len()
    }
}

/// Outcome of a migrate: the clear step followed by a push
#[derive(Debug, Default)]
pub struct MigrateReport {
    pub cleared: Vec<Node>,
    pub clear_errors: Vec<NoteError>,
    pub pushed: SyncReport,
}

impl MigrateReport {
    pub fn error_count(&self) -> usize {
        self.clear_errors.len() + self.pushed.errors.len()
    }

    pub fn errors(&self) -> impl Iterator<Item = &NoteError> {
        self.clear_errors.iter().chain(self.pushed.errors.iter())
    }
}

/// What was done to a node on the receiving store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Mkdir,
    Create,
    Update,
}

/// Pull missing and differing nodes from `remote` into `local`.
pub fn fetch(local: &dyn NodeStore, remote: &dyn NodeStore) -> SyncReport {
    transfer(remote, local)
}

/// Send missing and differing nodes from `local` to `remote`.
pub fn push(local: &dyn NodeStore, remote: &dyn NodeStore) -> SyncReport {
    transfer(local, remote)
}

/// Replace everything in `remote` with the content of `local`.
///
/// The clear step never stops the push; a crash between the two leaves
/// `remote` partially cleared.
pub fn migrate(local: &dyn NodeStore, remote: &dyn NodeStore) -> MigrateReport {
    let (cleared, clear_errors) = remote.clear_nodes();
    info!(
        store = %remote.kind(),
        cleared = cleared.len(),
        errors = clear_errors.len(),
        "Cleared store before migrate"
    );

    let pushed = push(local, remote);
    MigrateReport {
        cleared,
        clear_errors,
        pushed,
    }
}

fn transfer(source: &dyn NodeStore, target: &dyn NodeStore) -> SyncReport {
    let mut report = SyncReport::default();

    let mut nodes = match source.get_all("", None, source.reserved()) {
        Ok(listing) => {
            for (node, e) in listing.unreadable {
                warn!(title = %node.title, error = %e, "Skipping unreadable node");
                report.errors.push(e);
            }
            listing.nodes
        }
        Err(e) if e.is_empty_working_directory() => {
            debug!(source = %source.root(), "Nothing to transfer");
            return report;
        }
        Err(e) => {
            warn!(source = %source.root(), error = %e, "Failed to list source store");
            report.errors.push(e);
            return report;
        }
    };

    // Stable: equal-length titles keep the source listing order.
    nodes.sort_by_key(|node| node.title.len());

    for node in nodes {
        if target.reserved().matches(&node.title) {
            continue;
        }
        match apply(&node, target) {
            Ok(Some(action)) => {
                info!(title = %node.title, ?action, from = %source.kind(), to = %target.kind(), "Synced node");
                report.nodes.push(node);
            }
            Ok(None) => debug!(title = %node.title, "Already in sync"),
            Err(e) => {
                warn!(title = %node.title, error = %e, "Failed to sync node");
                report.errors.push(e);
            }
        }
    }

    report
}

fn apply(node: &Node, target: &dyn NodeStore) -> Result<Option<Action>, NoteError> {
    let exists = target.is_node_exists(node)?;

    match (node.kind, exists) {
        (NodeKind::Directory, true) => Ok(None),
        (NodeKind::Directory, false) => {
            target.mkdir(node)?;
            Ok(Some(Action::Mkdir))
        }
        (NodeKind::File, false) => {
            target.create(node)?;
            Ok(Some(Action::Create))
        }
        (NodeKind::File, true) => {
            let current = target.view(&node.without_body())?;
            if current.kind != NodeKind::File {
                return Err(NoteError::InvalidPath(format!(
                    "{} is a directory in {}",
                    node.title,
                    target.root()
                )));
            }
            if current.body == node.body {
                return Ok(None);
            }
            target.edit(node)?;
            Ok(Some(Action::Update))
        }
    }
}
