//! Filesystem-backed node store
//!
//! Notes are plain files and folders are directories under the store root.
//! The kind of a node is always probed from the filesystem.

use crate::error::NoteError;
use crate::ignore::IgnoreSet;
use crate::node::{EditNode, Listing, Node, NodeKind, StoreKind};
use crate::settings::{Settings, SETTINGS_TITLE};
use crate::store::{remove_in_order, NodeStore};
use crate::tooling::Editor;
use crate::tree::path::{normalize_title, resolve_path};
use crate::tree::walker::{Entry, Walker};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Local filesystem store
#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
    reserved: IgnoreSet,
}

impl LocalStore {
    /// Create a store rooted at `root`. Nothing is touched until [`NodeStore::init`].
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: dunce::simplified(root.as_ref()).to_path_buf(),
            reserved: IgnoreSet::default(),
        }
    }

    /// Replace the reserved set used by `clear_nodes`.
    pub fn with_reserved(mut self, reserved: IgnoreSet) -> Self {
        self.reserved = reserved;
        self
    }

    pub fn root_path(&self) -> &Path {
        &self.root
    }

    fn settings_path(&self) -> PathBuf {
        self.root.join(SETTINGS_TITLE)
    }

    fn resolve(&self, title: &str) -> Result<(String, PathBuf), NoteError> {
        let title = normalize_title(title)?;
        let path = resolve_path(&self.root, &title)?;
        Ok((title, path))
    }

    /// Kind of whatever lives at `path`, if anything.
    fn probe(&self, path: &Path) -> Result<Option<NodeKind>, NoteError> {
        match fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => Ok(Some(NodeKind::Directory)),
            Ok(_) => Ok(Some(NodeKind::File)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(NoteError::io(path, e)),
        }
    }

    fn resolved(
        &self,
        template: &Node,
        title: String,
        path: &Path,
        kind: NodeKind,
        body: String,
    ) -> Node {
        let mut node = Node {
            title,
            kind,
            path: template.path.clone(),
            body,
        };
        node.path
            .insert(StoreKind::Local, path.display().to_string());
        node
    }

    fn ensure_parent(&self, path: &Path) -> Result<(), NoteError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| NoteError::io(parent, e))?;
        }
        Ok(())
    }

    fn remove_entry(&self, node: &Node) -> Result<(), NoteError> {
        let (_, path) = self.resolve(&node.title)?;
        let result = if node.is_dir() {
            fs::remove_dir(&path)
        } else {
            fs::remove_file(&path)
        };
        result.map_err(|e| NoteError::io(&path, e))
    }
}

impl NodeStore for LocalStore {
    fn kind(&self) -> StoreKind {
        StoreKind::Local
    }

    fn root(&self) -> String {
        self.root.display().to_string()
    }

    fn reserved(&self) -> &IgnoreSet {
        &self.reserved
    }

    fn init(&self) -> Result<(), NoteError> {
        let settings_path = self.settings_path();
        if self.root.is_dir() && settings_path.is_file() {
            debug!(root = %self.root.display(), "Local store already initialized");
            return Ok(());
        }

        fs::create_dir_all(&self.root).map_err(|e| NoteError::io(&self.root, e))?;
        if !settings_path.exists() {
            self.write_settings(&Settings::default_for(self.root()))?;
        }

        info!(root = %self.root.display(), "Initialized local store");
        Ok(())
    }

    fn settings(&self) -> Result<Settings, NoteError> {
        let path = self.settings_path();
        let body = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                NoteError::NotExists(path.display().to_string())
            } else {
                NoteError::io(&path, e)
            }
        })?;
        Settings::from_toml(&body)
    }

    fn write_settings(&self, settings: &Settings) -> Result<(), NoteError> {
        settings.validate()?;
        let path = self.settings_path();
        fs::write(&path, settings.to_toml()?).map_err(|e| NoteError::io(&path, e))
    }

    fn is_node_exists(&self, node: &Node) -> Result<bool, NoteError> {
        let (title, path) = self.resolve(&node.title)?;
        if title.is_empty() {
            return Ok(true);
        }
        Ok(self.probe(&path)?.is_some())
    }

    fn open(&self, node: &Node) -> Result<(), NoteError> {
        let (title, path) = self.resolve(&node.title)?;
        if self.probe(&path)?.is_none() {
            return Err(NoteError::NotExists(title));
        }
        let settings = self.settings()?;
        Editor::new(settings.editor).launch(&path)
    }

    fn create(&self, note: &Node) -> Result<Node, NoteError> {
        let (title, path) = self.resolve(&note.title)?;
        if title.is_empty() {
            return Err(NoteError::InvalidPath(
                "cannot create a note at the store root".to_string(),
            ));
        }
        if self.probe(&path)?.is_some() {
            return Err(NoteError::AlreadyExists(title));
        }

        self.ensure_parent(&path)?;
        fs::write(&path, &note.body).map_err(|e| NoteError::io(&path, e))?;

        debug!(title = %title, "Created note");
        Ok(self.resolved(note, title, &path, NodeKind::File, note.body.clone()))
    }

    fn view(&self, note: &Node) -> Result<Node, NoteError> {
        let (title, path) = self.resolve(&note.title)?;
        match self.probe(&path)? {
            None => Err(NoteError::NotExists(title)),
            Some(NodeKind::Directory) => {
                Ok(self.resolved(note, title, &path, NodeKind::Directory, String::new()))
            }
            Some(NodeKind::File) => {
                let body = fs::read_to_string(&path).map_err(|e| NoteError::io(&path, e))?;
                Ok(self.resolved(note, title, &path, NodeKind::File, body))
            }
        }
    }

    fn edit(&self, note: &Node) -> Result<Node, NoteError> {
        let (title, path) = self.resolve(&note.title)?;
        match self.probe(&path)? {
            None => Err(NoteError::NotExists(title)),
            Some(NodeKind::Directory) => Err(NoteError::InvalidPath(format!(
                "{} is a directory",
                title
            ))),
            Some(NodeKind::File) => {
                fs::write(&path, &note.body).map_err(|e| NoteError::io(&path, e))?;
                debug!(title = %title, "Edited note");
                Ok(self.resolved(note, title, &path, NodeKind::File, note.body.clone()))
            }
        }
    }

    fn remove(&self, node: &Node) -> Result<(), NoteError> {
        let (title, path) = self.resolve(&node.title)?;
        if title.is_empty() {
            return Err(NoteError::InvalidPath(
                "cannot remove the store root".to_string(),
            ));
        }

        match self.probe(&path)? {
            None => Err(NoteError::NotExists(title)),
            Some(NodeKind::File) => fs::remove_file(&path).map_err(|e| NoteError::io(&path, e)),
            Some(NodeKind::Directory) => {
                let everything = IgnoreSet::empty();
                let descendants = Walker::new(self.root.clone(), path.clone(), &everything)
                    .walk()?
                    .into_iter()
                    .map(|entry| match entry {
                        Entry::File { title, .. } => Node::note(title, ""),
                        Entry::Directory { title, .. } => Node::folder(title),
                    })
                    .collect();

                remove_in_order(descendants, |descendant| self.remove_entry(descendant))?;
                fs::remove_dir(&path).map_err(|e| NoteError::io(&path, e))?;

                debug!(title = %title, "Removed directory");
                Ok(())
            }
        }
    }

    fn rename(&self, edit: &EditNode) -> Result<(), NoteError> {
        let (current_title, current_path) = self.resolve(&edit.current.title)?;
        let (new_title, new_path) = self.resolve(&edit.new.title)?;

        if current_title.is_empty() || self.probe(&current_path)?.is_none() {
            return Err(NoteError::NotExists(current_title));
        }
        edit.validate()?;
        if new_title.is_empty() || self.probe(&new_path)?.is_some() {
            return Err(NoteError::AlreadyExists(new_title));
        }

        self.ensure_parent(&new_path)?;
        fs::rename(&current_path, &new_path).map_err(|e| NoteError::io(&current_path, e))?;

        debug!(from = %current_title, to = %new_title, "Renamed node");
        Ok(())
    }

    fn mkdir(&self, folder: &Node) -> Result<Node, NoteError> {
        let (title, path) = self.resolve(&folder.title)?;
        if title.is_empty() || self.probe(&path)?.is_some() {
            return Err(NoteError::AlreadyExists(title));
        }

        fs::create_dir_all(&path).map_err(|e| NoteError::io(&path, e))?;

        debug!(title = %title, "Created directory");
        Ok(self.resolved(folder, title, &path, NodeKind::Directory, String::new()))
    }

    fn get_all(
        &self,
        subpath: &str,
        kind: Option<NodeKind>,
        ignore: &IgnoreSet,
    ) -> Result<Listing, NoteError> {
        let (subtitle, start) = self.resolve(subpath)?;
        match self.probe(&start)? {
            None if subtitle.is_empty() => return Err(NoteError::NotExists(self.root())),
            None => return Err(NoteError::NotExists(subtitle)),
            Some(NodeKind::File) => {
                return Err(NoteError::InvalidPath(format!(
                    "{} is not a directory",
                    subtitle
                )))
            }
            Some(NodeKind::Directory) => {}
        }

        let mut listing = Listing::default();
        for entry in Walker::new(self.root.clone(), start.clone(), ignore).walk()? {
            let (path, title, entry_kind) = match entry {
                Entry::File { path, title } => (path, title, NodeKind::File),
                Entry::Directory { path, title } => (path, title, NodeKind::Directory),
            };
            if kind.is_some_and(|wanted| wanted != entry_kind) {
                continue;
            }

            let address = path.display().to_string();
            let mut node = Node {
                title,
                kind: entry_kind,
                path: [(StoreKind::Local, address.clone())].into_iter().collect(),
                body: String::new(),
            };
            if entry_kind == NodeKind::File {
                match fs::read_to_string(&path) {
                    Ok(body) => node.body = body,
                    Err(e) => {
                        warn!(title = %node.title, error = %e, "Could not load note body");
                        listing.push_unreadable(node, NoteError::io(&path, e));
                        continue;
                    }
                }
            }
            listing.push(node, address);
        }

        if listing.is_empty() {
            let target = if subtitle.is_empty() {
                self.root()
            } else {
                subtitle
            };
            return Err(NoteError::EmptyWorkingDirectory(target));
        }

        Ok(listing)
    }
}
