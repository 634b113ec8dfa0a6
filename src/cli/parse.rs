//! CLI parse: clap types for notebox. No behavior; definitions only.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::node::NodeKind;

/// Notebox CLI - personal notes with a mirrored store
#[derive(Parser, Debug)]
#[command(name = "notebox")]
#[command(about = "Personal note manager with mirrored stores and manual sync")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Notes root directory (overrides configuration and stored settings)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// Which store a single-node command runs against
#[derive(Args, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Target {
    /// Run against the remote store instead of the local one
    #[arg(long)]
    pub remote: bool,
}

impl Target {
    pub fn local() -> Self {
        Self { remote: false }
    }

    pub fn remote() -> Self {
        Self { remote: true }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindFilter {
    File,
    Dir,
}

impl From<KindFilter> for NodeKind {
    fn from(filter: KindFilter) -> Self {
        match filter {
            KindFilter::File => NodeKind::File,
            KindFilter::Dir => NodeKind::Directory,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Initialize the notes root and default settings
    Init {
        #[command(flatten)]
        target: Target,
    },
    /// Create a note
    Create {
        title: String,
        /// Initial body
        #[arg(long, default_value = "")]
        body: String,
        /// Open the note in the editor after creating it
        #[arg(long)]
        open: bool,
        #[command(flatten)]
        target: Target,
    },
    /// Print a note
    View {
        title: String,
        #[command(flatten)]
        target: Target,
    },
    /// Replace the body of a note
    Edit {
        title: String,
        #[arg(long)]
        body: String,
        #[command(flatten)]
        target: Target,
    },
    /// Open a note in the configured editor
    Open {
        title: String,
        #[command(flatten)]
        target: Target,
    },
    /// Remove a note or a folder with everything in it
    Rm {
        title: String,
        /// Do not ask before removing a folder
        #[arg(long)]
        yes: bool,
        #[command(flatten)]
        target: Target,
    },
    /// Rename or move a note or folder
    Mv {
        from: String,
        to: String,
        #[command(flatten)]
        target: Target,
    },
    /// Create a folder
    Mkdir {
        title: String,
        #[command(flatten)]
        target: Target,
    },
    /// List notes and folders
    Ls {
        /// Folder to list (default: everything)
        #[arg(default_value = "")]
        subpath: String,
        /// Only list this kind
        #[arg(long, value_enum)]
        kind: Option<KindFilter>,
        /// Output format (text, table or json)
        #[arg(long, default_value = "text")]
        format: String,
        #[command(flatten)]
        target: Target,
    },
    /// Pull missing and changed notes from the remote store
    Fetch,
    /// Send missing and changed notes to the remote store
    Push,
    /// Replace the remote store content with the local content
    Migrate {
        /// Do not ask for confirmation
        #[arg(long)]
        yes: bool,
    },
    /// Show or change stored settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SettingsCommands {
    /// Show stored settings
    Show {
        #[command(flatten)]
        target: Target,
    },
    /// Change stored settings of the local store
    Set {
        /// Editor command
        #[arg(long)]
        editor: Option<String>,
        /// Notes root used on the next run
        #[arg(long)]
        notes_root: Option<String>,
        /// Location of the remote sled database
        #[arg(long)]
        remote_location: Option<String>,
        /// Forget the remote store
        #[arg(long, conflicts_with = "remote_location")]
        no_remote: bool,
    },
}
