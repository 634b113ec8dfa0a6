//! Route table tests: commands executed through RunContext

use super::test_utils::with_xdg_env;
use notebox::cli::{map_error, Commands, RunContext, SettingsCommands, Target};
use notebox::error::NoteError;
use std::path::PathBuf;
use tempfile::TempDir;

struct Env {
    temp_dir: TempDir,
    root: PathBuf,
    config: PathBuf,
}

impl Env {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("notes");
        let config = temp_dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        Self {
            temp_dir,
            root,
            config,
        }
    }

    fn context(&self) -> RunContext {
        RunContext::new(Some(self.root.clone()), Some(self.config.clone()))
            .unwrap()
            .assume_yes(true)
    }

    fn remote_location(&self) -> String {
        self.temp_dir
            .path()
            .join("remote.db")
            .to_string_lossy()
            .to_string()
    }
}

fn create(title: &str, body: &str, target: Target) -> Commands {
    Commands::Create {
        title: title.to_string(),
        body: body.to_string(),
        open: false,
        target,
    }
}

fn view(title: &str, target: Target) -> Commands {
    Commands::View {
        title: title.to_string(),
        target,
    }
}

fn set_remote(location: String) -> Commands {
    Commands::Settings {
        command: SettingsCommands::Set {
            editor: None,
            notes_root: None,
            remote_location: Some(location),
            no_remote: false,
        },
    }
}

#[test]
fn test_create_view_and_list_locally() {
    let env = Env::new();
    let ctx = env.context();

    let out = ctx
        .execute(&create("todo/today.md", "buy milk", Target::local()))
        .unwrap();
    assert!(out.starts_with("Created"));

    assert_eq!(
        ctx.execute(&view("todo/today.md", Target::local())).unwrap(),
        "buy milk"
    );

    let listing = ctx
        .execute(&Commands::Ls {
            subpath: String::new(),
            kind: None,
            format: "json".to_string(),
            target: Target::local(),
        })
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&listing).unwrap();
    let titles: Vec<&str> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["todo", "todo/today.md"]);
}

#[test]
fn test_ls_on_empty_root_reports_no_notes() {
    let env = Env::new();
    let out = env
        .context()
        .execute(&Commands::Ls {
            subpath: String::new(),
            kind: None,
            format: "text".to_string(),
            target: Target::local(),
        })
        .unwrap();
    assert_eq!(out, "No notes found.");
}

#[test]
fn test_sync_without_remote_is_invalid_settings() {
    let env = Env::new();
    let err = env.context().execute(&Commands::Push).unwrap_err();
    assert!(matches!(err, NoteError::InvalidSettings(_)));
}

#[test]
fn test_push_then_view_remote() {
    let env = Env::new();
    env.context()
        .execute(&set_remote(env.remote_location()))
        .unwrap();

    let ctx = env.context();
    assert!(ctx.remote().is_some());
    ctx.execute(&create("ideas/rust.md", "ownership", Target::local()))
        .unwrap();

    let out = ctx.execute(&Commands::Push).unwrap();
    assert!(out.contains("2 nodes"), "{}", out);
    assert_eq!(
        ctx.execute(&view("ideas/rust.md", Target::remote())).unwrap(),
        "ownership"
    );
}

#[test]
fn test_fetch_pulls_remote_edits() {
    let env = Env::new();
    env.context()
        .execute(&set_remote(env.remote_location()))
        .unwrap();

    let ctx = env.context();
    ctx.execute(&create("a.txt", "v1", Target::local())).unwrap();
    ctx.execute(&create("a.txt", "v2", Target::remote())).unwrap();

    ctx.execute(&Commands::Fetch).unwrap();
    assert_eq!(ctx.execute(&view("a.txt", Target::local())).unwrap(), "v2");
}

#[test]
fn test_migrate_with_assume_yes() {
    let env = Env::new();
    env.context()
        .execute(&set_remote(env.remote_location()))
        .unwrap();

    let ctx = env.context();
    ctx.execute(&create("stale.md", "old", Target::remote())).unwrap();
    ctx.execute(&create("fresh.md", "new", Target::local())).unwrap();

    ctx.execute(&Commands::Migrate { yes: false }).unwrap();

    let err = ctx.execute(&view("stale.md", Target::remote())).unwrap_err();
    assert!(err.is_not_exists());
    assert_eq!(ctx.execute(&view("fresh.md", Target::remote())).unwrap(), "new");
}

#[test]
fn test_remove_folder_and_rename_same_title() {
    let env = Env::new();
    let ctx = env.context();
    ctx.execute(&create("box/a.md", "a", Target::local())).unwrap();

    let err = ctx
        .execute(&Commands::Mv {
            from: "box/a.md".to_string(),
            to: "box/a.md".to_string(),
            target: Target::local(),
        })
        .unwrap_err();
    assert!(map_error(&err).starts_with("Nothing to do"));

    let out = ctx
        .execute(&Commands::Rm {
            title: "box".to_string(),
            yes: false,
            target: Target::local(),
        })
        .unwrap();
    assert_eq!(out, "Removed box");
    assert!(!env.root.join("box").exists());
}

#[test]
fn test_stored_notes_root_retargets_default_root() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let config = temp_dir.path().join("config.toml");
        std::fs::write(&config, "").unwrap();
        let elsewhere = temp_dir.path().join("elsewhere");

        let ctx = RunContext::new(None, Some(config.clone())).unwrap();
        ctx.execute(&Commands::Settings {
            command: SettingsCommands::Set {
                editor: None,
                notes_root: Some(elsewhere.to_string_lossy().to_string()),
                remote_location: None,
                no_remote: false,
            },
        })
        .unwrap();

        let ctx = RunContext::new(None, Some(config)).unwrap();
        ctx.execute(&create("moved.md", "here", Target::local()))
            .unwrap();

        assert!(elsewhere.join("moved.md").is_file());
        assert!(temp_dir.path().join("home/.notebox").is_dir());
    });
}
