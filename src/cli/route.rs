//! CLI route: single route table and run context. Dispatches to stores, the
//! synchronizer and presentation.

use crate::cli::parse::{Commands, SettingsCommands, Target};
use crate::cli::presentation::{
    format_listing, format_migrate_report, format_settings, format_sync_report,
};
use crate::config::{ConfigLoader, NoteboxConfig};
use crate::error::NoteError;
use crate::node::{EditNode, Node, NodeKind, StoreKind};
use crate::settings::{RemoteSettings, Settings};
use crate::store::{LocalStore, NodeStore, SledStore};
use crate::sync;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime context for CLI execution: configuration plus the local store and
/// the optional remote store. Every command receives the store it acts on
/// from here; nothing selects a store globally.
pub struct RunContext {
    config: NoteboxConfig,
    local: LocalStore,
    remote: Option<SledStore>,
    assume_yes: bool,
}

impl RunContext {
    /// Create run context from an optional root override and optional config path.
    ///
    /// The local store is initialized at the configured root. When its
    /// settings name a different notes root (and no explicit root was given)
    /// the store is re-targeted there.
    pub fn new(root: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<Self, NoteError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        config.validate()?;

        let explicit_root = root.is_some();
        let bootstrap_root = match root {
            Some(root) => root,
            None => config.notes_root()?,
        };

        let mut local = LocalStore::new(&bootstrap_root).with_reserved(config.ignore_set());
        local.init()?;
        let settings = local.settings()?;

        if !explicit_root && Path::new(&settings.notes_root) != local.root_path() {
            info!(
                from = %local.root(),
                to = %settings.notes_root,
                "Notes root overridden by stored settings"
            );
            let target =
                LocalStore::new(&settings.notes_root).with_reserved(config.ignore_set());
            let fresh = target.settings().is_err();
            target.init()?;
            if fresh {
                target.write_settings(&settings)?;
            }
            local = target;
        }

        let remote = match local.settings()?.remote {
            Some(remote) => Some(open_remote(&remote, &config)?),
            None => None,
        };

        Ok(Self {
            config,
            local,
            remote,
            assume_yes: false,
        })
    }

    /// Skip interactive confirmations (scripts and tests).
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn remote(&self) -> Option<&SledStore> {
        self.remote.as_ref()
    }

    fn remote_store(&self) -> Result<&SledStore, NoteError> {
        self.remote.as_ref().ok_or_else(|| {
            NoteError::InvalidSettings(
                "no remote store configured; run `notebox settings set --remote-location <path>`"
                    .to_string(),
            )
        })
    }

    /// The store a single-node command acts on.
    fn store(&self, target: Target) -> Result<&dyn NodeStore, NoteError> {
        if target.remote {
            Ok(self.remote_store()?)
        } else {
            Ok(&self.local)
        }
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, NoteError> {
        let output = self.execute_inner(command)?;
        if let Some(remote) = &self.remote {
            remote.flush()?;
        }
        Ok(output)
    }

    fn execute_inner(&self, command: &Commands) -> Result<String, NoteError> {
        match command {
            Commands::Init { target } => {
                let store = self.store(*target)?;
                store.init()?;
                Ok(format!("Initialized {} store at {}", store.kind(), store.root()))
            }
            Commands::Create {
                title,
                body,
                open,
                target,
            } => {
                let store = self.store(*target)?;
                let created = store.create(&Node::note(title.as_str(), body.as_str()))?;
                if *open {
                    store.open(&created)?;
                }
                Ok(format!("Created {}", display_address(store, &created)))
            }
            Commands::View { title, target } => {
                let node = self.store(*target)?.view(&Node::note(title.as_str(), ""))?;
                Ok(node.body)
            }
            Commands::Edit {
                title,
                body,
                target,
            } => {
                let store = self.store(*target)?;
                let edited = store.edit(&Node::note(title.as_str(), body.as_str()))?;
                Ok(format!("Updated {}", display_address(store, &edited)))
            }
            Commands::Open { title, target } => {
                self.store(*target)?.open(&Node::note(title.as_str(), ""))?;
                Ok(String::new())
            }
            Commands::Rm { title, yes, target } => self.handle_remove(title, *yes, *target),
            Commands::Mv { from, to, target } => {
                let edit = EditNode::new(Node::note(from.as_str(), ""), Node::note(to.as_str(), ""));
                self.store(*target)?.rename(&edit)?;
                Ok(format!("Renamed {} -> {}", from, to))
            }
            Commands::Mkdir { title, target } => {
                let store = self.store(*target)?;
                let created = store.mkdir(&Node::folder(title.as_str()))?;
                Ok(format!("Created folder {}", display_address(store, &created)))
            }
            Commands::Ls {
                subpath,
                kind,
                format,
                target,
            } => {
                let store = self.store(*target)?;
                let kind: Option<NodeKind> = kind.map(Into::into);
                match store.get_all(subpath, kind, &self.config.ignore_set()) {
                    Ok(listing) => format_listing(&listing, format),
                    Err(e) if e.is_empty_working_directory() => Ok("No notes found.".to_string()),
                    Err(e) => Err(e),
                }
            }
            Commands::Fetch => {
                let report = sync::fetch(&self.local, self.remote_store()?);
                Ok(format_sync_report("Fetched", &report))
            }
            Commands::Push => {
                let report = sync::push(&self.local, self.remote_store()?);
                Ok(format_sync_report("Pushed", &report))
            }
            Commands::Migrate { yes } => {
                let remote = self.remote_store()?;
                if !self.confirm(
                    *yes,
                    &format!("Replace everything in {} with {}?", remote.root(), self.local.root()),
                )? {
                    return Ok("Migrate cancelled".to_string());
                }
                let report = sync::migrate(&self.local, remote);
                Ok(format_migrate_report(&report))
            }
            Commands::Settings { command } => self.handle_settings_command(command),
        }
    }

    fn handle_remove(&self, title: &str, yes: bool, target: Target) -> Result<String, NoteError> {
        let store = self.store(target)?;
        let node = store.view(&Node::note(title, ""))?;
        if node.is_dir()
            && !self.confirm(yes, &format!("Remove folder '{}' and everything in it?", node.title))?
        {
            return Ok("Removal cancelled".to_string());
        }
        store.remove(&node)?;
        Ok(format!("Removed {}", node.title))
    }

    fn handle_settings_command(&self, command: &SettingsCommands) -> Result<String, NoteError> {
        match command {
            SettingsCommands::Show { target } => {
                Ok(format_settings(&self.store(*target)?.settings()?))
            }
            SettingsCommands::Set {
                editor,
                notes_root,
                remote_location,
                no_remote,
            } => {
                let mut settings = self.local.settings()?;
                apply_settings_changes(
                    &mut settings,
                    editor.as_deref(),
                    notes_root.as_deref(),
                    remote_location.as_deref(),
                    *no_remote,
                );
                self.local.write_settings(&settings)?;
                Ok(format!("Settings saved\n{}", format_settings(&settings)))
            }
        }
    }

    fn confirm(&self, yes: bool, prompt: &str) -> Result<bool, NoteError> {
        if yes || self.assume_yes {
            return Ok(true);
        }
        use dialoguer::Confirm;
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| NoteError::Config(format!("Failed to get user input: {}", e)))
    }
}

fn open_remote(remote: &RemoteSettings, config: &NoteboxConfig) -> Result<SledStore, NoteError> {
    let store = SledStore::open(&remote.location)?.with_reserved(config.ignore_set());
    store.init()?;
    Ok(store)
}

fn display_address(store: &dyn NodeStore, node: &Node) -> String {
    node.address(store.kind())
        .map(str::to_string)
        .unwrap_or_else(|| node.title.clone())
}

fn apply_settings_changes(
    settings: &mut Settings,
    editor: Option<&str>,
    notes_root: Option<&str>,
    remote_location: Option<&str>,
    no_remote: bool,
) {
    if let Some(editor) = editor {
        settings.editor = editor.to_string();
    }
    if let Some(root) = notes_root {
        settings.notes_root = root.to_string();
    }
    if let Some(location) = remote_location {
        settings.remote = Some(RemoteSettings {
            backend: StoreKind::Sled,
            location: location.to_string(),
        });
    }
    if no_remote {
        settings.remote = None;
    }
}
