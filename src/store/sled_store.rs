//! Key/value node store on top of sled
//!
//! Each node is one entry in the `nodes` tree: the key is the normalized
//! title, the value a bincode-encoded [`Record`]. Folders are explicit
//! records so empty directories survive a round trip. Settings live in the
//! reserved settings node like in every other store.

use crate::error::NoteError;
use crate::ignore::IgnoreSet;
use crate::node::{EditNode, Listing, Node, NodeKind, StoreKind};
use crate::settings::{Settings, SETTINGS_TITLE};
use crate::store::{remove_in_order, NodeStore};
use crate::tooling::Editor;
use crate::tree::path::{ancestor_titles, normalize_title, resolve};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

const NODES_TREE: &str = "nodes";

/// Stored form of a node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Record {
    kind: NodeKind,
    body: String,
}

impl Record {
    fn file(body: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::File,
            body: body.into(),
        }
    }

    fn directory() -> Self {
        Self {
            kind: NodeKind::Directory,
            body: String::new(),
        }
    }
}

/// Sled-based implementation of NodeStore
pub struct SledStore {
    db: sled::Db,
    nodes: sled::Tree,
    location: String,
    reserved: IgnoreSet,
}

impl SledStore {
    /// Open (or create) a store database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NoteError> {
        let path = path.as_ref();
        let db = sled::open(path)
            .map_err(|e| NoteError::Storage(format!("Failed to open sled database: {}", e)))?;
        Self::from_db(db, path.display().to_string())
    }

    /// In-memory store removed on drop.
    pub fn temporary() -> Result<Self, NoteError> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db, "sled:temporary".to_string())
    }

    fn from_db(db: sled::Db, location: String) -> Result<Self, NoteError> {
        let nodes = db.open_tree(NODES_TREE)?;
        Ok(Self {
            db,
            nodes,
            location,
            reserved: IgnoreSet::default(),
        })
    }

    /// Replace the reserved set used by `clear_nodes`.
    pub fn with_reserved(mut self, reserved: IgnoreSet) -> Self {
        self.reserved = reserved;
        self
    }

    /// Flush all pending writes to disk
    pub fn flush(&self) -> Result<(), NoteError> {
        self.db.flush()?;
        Ok(())
    }

    fn address(&self, title: &str) -> Result<String, NoteError> {
        resolve(&self.location, title)
    }

    fn get(&self, title: &str) -> Result<Option<Record>, NoteError> {
        match self.nodes.get(title.as_bytes())? {
            Some(value) => Ok(Some(bincode::deserialize(&value)?)),
            None => Ok(None),
        }
    }

    fn put(&self, title: &str, record: &Record) -> Result<(), NoteError> {
        self.nodes
            .insert(title.as_bytes(), bincode::serialize(record)?)?;
        Ok(())
    }

    /// Every record strictly below `title`, in key order.
    fn descendants(&self, title: &str) -> Result<Vec<(String, Record)>, NoteError> {
        let prefix = if title.is_empty() {
            String::new()
        } else {
            format!("{}/", title)
        };

        let mut out = Vec::new();
        for item in self.nodes.scan_prefix(prefix.as_bytes()) {
            let (key, value) = item?;
            let key = String::from_utf8(key.to_vec())
                .map_err(|e| NoteError::Serialization(format!("Invalid node key: {}", e)))?;
            out.push((key, bincode::deserialize(&value)?));
        }
        Ok(out)
    }

    /// Queue directory records for every missing ancestor of `title`.
    fn add_missing_ancestors(&self, title: &str, batch: &mut sled::Batch) -> Result<(), NoteError> {
        for ancestor in ancestor_titles(title) {
            match self.get(&ancestor)? {
                Some(record) if record.kind == NodeKind::File => {
                    return Err(NoteError::InvalidPath(format!(
                        "{} is a file",
                        ancestor
                    )))
                }
                Some(_) => {}
                None => batch.insert(ancestor.as_bytes(), bincode::serialize(&Record::directory())?),
            }
        }
        Ok(())
    }

    fn to_node(&self, template: &Node, title: String, record: Record) -> Result<Node, NoteError> {
        let mut path = template.path.clone();
        path.insert(StoreKind::Sled, self.address(&title)?);
        Ok(Node {
            title,
            kind: record.kind,
            path,
            body: record.body,
        })
    }

    fn insert_with_ancestors(&self, title: &str, record: &Record) -> Result<(), NoteError> {
        let mut batch = sled::Batch::default();
        self.add_missing_ancestors(title, &mut batch)?;
        batch.insert(title.as_bytes(), bincode::serialize(record)?);
        self.nodes.apply_batch(batch)?;
        Ok(())
    }
}

impl NodeStore for SledStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Sled
    }

    fn root(&self) -> String {
        self.location.clone()
    }

    fn reserved(&self) -> &IgnoreSet {
        &self.reserved
    }

    fn init(&self) -> Result<(), NoteError> {
        if self.get(SETTINGS_TITLE)?.is_some() {
            debug!(location = %self.location, "Sled store already initialized");
            return Ok(());
        }

        self.write_settings(&Settings::default_for(self.location.clone()))?;
        info!(location = %self.location, "Initialized sled store");
        Ok(())
    }

    fn settings(&self) -> Result<Settings, NoteError> {
        match self.get(SETTINGS_TITLE)? {
            Some(record) => Settings::from_toml(&record.body),
            None => Err(NoteError::NotExists(SETTINGS_TITLE.to_string())),
        }
    }

    fn write_settings(&self, settings: &Settings) -> Result<(), NoteError> {
        settings.validate()?;
        self.put(SETTINGS_TITLE, &Record::file(settings.to_toml()?))
    }

    fn is_node_exists(&self, node: &Node) -> Result<bool, NoteError> {
        let title = normalize_title(&node.title)?;
        if title.is_empty() {
            return Ok(true);
        }
        Ok(self.nodes.contains_key(title.as_bytes())?)
    }

    fn open(&self, node: &Node) -> Result<(), NoteError> {
        let current = self.view(node)?;
        if current.is_dir() {
            return Err(NoteError::InvalidPath(format!(
                "{} is a directory",
                current.title
            )));
        }

        let suffix = Path::new(&current.title)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        let scratch = tempfile::Builder::new()
            .prefix("notebox-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| NoteError::io(std::env::temp_dir(), e))?;
        std::fs::write(scratch.path(), &current.body)
            .map_err(|e| NoteError::io(scratch.path(), e))?;

        Editor::new(self.settings()?.editor).launch(scratch.path())?;

        let body = std::fs::read_to_string(scratch.path())
            .map_err(|e| NoteError::io(scratch.path(), e))?;
        if body != current.body {
            self.edit(&Node::note(current.title, body))?;
        }
        Ok(())
    }

    fn create(&self, note: &Node) -> Result<Node, NoteError> {
        let title = normalize_title(&note.title)?;
        if title.is_empty() {
            return Err(NoteError::InvalidPath(
                "cannot create a note at the store root".to_string(),
            ));
        }
        if self.get(&title)?.is_some() {
            return Err(NoteError::AlreadyExists(title));
        }

        let record = Record::file(note.body.clone());
        self.insert_with_ancestors(&title, &record)?;

        debug!(title = %title, "Created note");
        self.to_node(note, title, record)
    }

    fn view(&self, note: &Node) -> Result<Node, NoteError> {
        let title = normalize_title(&note.title)?;
        match self.get(&title)? {
            Some(record) => self.to_node(note, title, record),
            None => Err(NoteError::NotExists(title)),
        }
    }

    fn edit(&self, note: &Node) -> Result<Node, NoteError> {
        let title = normalize_title(&note.title)?;
        match self.get(&title)? {
            None => Err(NoteError::NotExists(title)),
            Some(record) if record.kind == NodeKind::Directory => Err(NoteError::InvalidPath(
                format!("{} is a directory", title),
            )),
            Some(_) => {
                let record = Record::file(note.body.clone());
                self.put(&title, &record)?;
                debug!(title = %title, "Edited note");
                self.to_node(note, title, record)
            }
        }
    }

    fn remove(&self, node: &Node) -> Result<(), NoteError> {
        let title = normalize_title(&node.title)?;
        if title.is_empty() {
            return Err(NoteError::InvalidPath(
                "cannot remove the store root".to_string(),
            ));
        }

        let record = self
            .get(&title)?
            .ok_or_else(|| NoteError::NotExists(title.clone()))?;

        if record.kind == NodeKind::Directory {
            let descendants = self
                .descendants(&title)?
                .into_iter()
                .map(|(key, record)| match record.kind {
                    NodeKind::File => Node::note(key, ""),
                    NodeKind::Directory => Node::folder(key),
                })
                .collect();

            remove_in_order(descendants, |descendant| {
                self.nodes
                    .remove(descendant.title.as_bytes())
                    .map(|_| ())
                    .map_err(|e| {
                        NoteError::Storage(format!("Failed to remove {}: {}", descendant.title, e))
                    })
            })?;
        }

        self.nodes.remove(title.as_bytes())?;
        debug!(title = %title, "Removed node");
        Ok(())
    }

    fn rename(&self, edit: &EditNode) -> Result<(), NoteError> {
        let current_title = normalize_title(&edit.current.title)?;
        let new_title = normalize_title(&edit.new.title)?;

        let record = match self.get(&current_title)? {
            Some(record) if !current_title.is_empty() => record,
            _ => return Err(NoteError::NotExists(current_title)),
        };
        edit.validate()?;
        if new_title.is_empty() || self.get(&new_title)?.is_some() {
            return Err(NoteError::AlreadyExists(new_title));
        }
        if new_title.starts_with(&format!("{}/", current_title)) {
            return Err(NoteError::InvalidPath(format!(
                "cannot move {} inside itself",
                current_title
            )));
        }

        let mut batch = sled::Batch::default();
        self.add_missing_ancestors(&new_title, &mut batch)?;
        batch.remove(current_title.as_bytes());
        batch.insert(new_title.as_bytes(), bincode::serialize(&record)?);

        if record.kind == NodeKind::Directory {
            for (key, child) in self.descendants(&current_title)? {
                let moved = format!("{}{}", new_title, &key[current_title.len()..]);
                batch.remove(key.as_bytes());
                batch.insert(moved.as_bytes(), bincode::serialize(&child)?);
            }
        }

        self.nodes.apply_batch(batch)?;
        debug!(from = %current_title, to = %new_title, "Renamed node");
        Ok(())
    }

    fn mkdir(&self, folder: &Node) -> Result<Node, NoteError> {
        let title = normalize_title(&folder.title)?;
        if title.is_empty() || self.get(&title)?.is_some() {
            return Err(NoteError::AlreadyExists(title));
        }

        let record = Record::directory();
        self.insert_with_ancestors(&title, &record)?;

        debug!(title = %title, "Created directory");
        self.to_node(folder, title, record)
    }

    fn get_all(
        &self,
        subpath: &str,
        kind: Option<NodeKind>,
        ignore: &IgnoreSet,
    ) -> Result<Listing, NoteError> {
        let subtitle = normalize_title(subpath)?;
        if !subtitle.is_empty() {
            match self.get(&subtitle)? {
                None => return Err(NoteError::NotExists(subtitle)),
                Some(record) if record.kind == NodeKind::File => {
                    return Err(NoteError::InvalidPath(format!(
                        "{} is not a directory",
                        subtitle
                    )))
                }
                Some(_) => {}
            }
        }

        let mut listing = Listing::default();
        for (title, record) in self.descendants(&subtitle)? {
            if ignore.matches(&title) || kind.is_some_and(|wanted| wanted != record.kind) {
                continue;
            }
            let address = self.address(&title)?;
            let node = self.to_node(&Node::root(), title, record)?;
            listing.push(node, address);
        }

        if listing.is_empty() {
            let target = if subtitle.is_empty() {
                self.location.clone()
            } else {
                subtitle
            };
            return Err(NoteError::EmptyWorkingDirectory(target));
        }

        Ok(listing)
    }
}
