//! CLI presentation: listing, sync report and settings formatters.

use crate::error::NoteError;
use crate::node::{Listing, NodeKind};
use crate::settings::Settings;
use crate::sync::{MigrateReport, SyncReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

pub fn format_listing(listing: &Listing, format: &str) -> Result<String, NoteError> {
    match format {
        "json" => {
            let arr: Vec<serde_json::Value> = listing
                .nodes
                .iter()
                .zip(&listing.paths)
                .map(|(node, path)| {
                    serde_json::json!({
                        "title": node.title,
                        "kind": node.kind.to_string(),
                        "path": path,
                    })
                })
                .collect();
            serde_json::to_string_pretty(&arr).map_err(|e| NoteError::Serialization(e.to_string()))
        }
        "table" => {
            let mut table = Table::new();
            table.load_preset(UTF8_BORDERS_ONLY);
            table.set_header(vec!["Title", "Kind", "Size", "Path"]);
            for (node, path) in listing.nodes.iter().zip(&listing.paths) {
                let size = match node.kind {
                    NodeKind::File => node.body.len().to_string(),
                    NodeKind::Directory => "-".to_string(),
                };
                table.add_row(vec![
                    node.title.clone(),
                    node.kind.to_string(),
                    size,
                    path.clone(),
                ]);
            }
            Ok(table.to_string())
        }
        "text" => Ok(listing
            .paths
            .iter()
            .zip(&listing.nodes)
            .map(|(path, node)| match node.kind {
                NodeKind::Directory => format!("{}/", path.blue().bold()),
                NodeKind::File => path.clone(),
            })
            .collect::<Vec<_>>()
            .join("\n")),
        other => Err(NoteError::Config(format!(
            "Invalid output format: {} (must be 'text', 'table' or 'json')",
            other
        ))),
    }
}

/// `<verb> N nodes` followed by the synced titles and any errors.
pub fn format_sync_report(verb: &str, report: &SyncReport) -> String {
    let mut s = format!("{} {} nodes", verb.green().bold(), report.count());
    for node in &report.nodes {
        s.push_str(&format!("\n  {} {}", "+".green(), node.title));
    }
    push_errors(&mut s, report.errors.iter());
    s
}

pub fn format_migrate_report(report: &MigrateReport) -> String {
    let mut s = format!(
        "{} {} nodes",
        "Cleared".yellow().bold(),
        report.cleared.len()
    );
    s.push('\n');
    s.push_str(&format_sync_report("Migrated", &report.pushed));
    push_errors(&mut s, report.clear_errors.iter());
    s
}

fn push_errors<'a>(s: &mut String, errors: impl ExactSizeIterator<Item = &'a NoteError>) {
    if errors.len() == 0 {
        return;
    }
    s.push_str(&format!("\n\n{} ({}):", "Errors".red().bold(), errors.len()));
    for e in errors {
        s.push_str(&format!("\n  - {}", e));
    }
}

pub fn format_settings(settings: &Settings) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Setting", "Value"]);
    table.add_row(vec!["editor".to_string(), settings.editor.clone()]);
    table.add_row(vec!["notes_root".to_string(), settings.notes_root.clone()]);
    match &settings.remote {
        Some(remote) => {
            table.add_row(vec!["remote.backend".to_string(), remote.backend.to_string()]);
            table.add_row(vec!["remote.location".to_string(), remote.location.clone()]);
        }
        None => {
            table.add_row(vec!["remote".to_string(), "-".to_string()]);
        }
    }
    table.to_string()
}
