//! CLI domain: parse, route, output, and presentation only.
//! No store logic; a single route table dispatches to stores and the synchronizer.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, KindFilter, SettingsCommands, Target};
pub use presentation::{
    format_listing, format_migrate_report, format_settings, format_sync_report,
};
pub use route::RunContext;
