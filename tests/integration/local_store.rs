//! Local filesystem store behavior

use super::test_utils::RecordingStore;
use notebox::error::NoteError;
use notebox::ignore::IgnoreSet;
use notebox::node::{EditNode, Node, NodeKind, StoreKind};
use notebox::settings::SETTINGS_TITLE;
use notebox::store::{remove_in_order, LocalStore, NodeStore};
use std::fs;
use tempfile::TempDir;

fn store() -> (LocalStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = LocalStore::new(temp_dir.path().join("notes"));
    store.init().unwrap();
    (store, temp_dir)
}

#[test]
fn test_init_writes_default_settings_once() {
    let (store, _temp) = store();
    let settings_path = store.root_path().join(SETTINGS_TITLE);
    assert!(settings_path.is_file());

    let mut settings = store.settings().unwrap();
    settings.editor = "nano".to_string();
    store.write_settings(&settings).unwrap();

    store.init().unwrap();
    assert_eq!(store.settings().unwrap().editor, "nano");
}

#[test]
fn test_create_view_edit_cycle() {
    let (store, _temp) = store();

    let created = store.create(&Node::note("todo/today.md", "milk")).unwrap();
    assert_eq!(created.kind, NodeKind::File);
    let address = created.address(StoreKind::Local).unwrap();
    assert!(address.ends_with("today.md"));
    assert!(store.root_path().join("todo").is_dir());

    let viewed = store.view(&Node::note("todo/today.md", "")).unwrap();
    assert_eq!(viewed.body, "milk");

    store.edit(&Node::note("todo/today.md", "milk\neggs")).unwrap();
    let raw = fs::read_to_string(store.root_path().join("todo/today.md")).unwrap();
    assert_eq!(raw, "milk\neggs");
}

#[test]
fn test_create_existing_fails() {
    let (store, _temp) = store();
    store.create(&Node::note("a.md", "one")).unwrap();

    let err = store.create(&Node::note("a.md", "two")).unwrap_err();
    assert!(matches!(err, NoteError::AlreadyExists(_)));
    assert_eq!(store.view(&Node::note("a.md", "")).unwrap().body, "one");
}

#[test]
fn test_edit_never_creates() {
    let (store, _temp) = store();
    let err = store.edit(&Node::note("ghost.md", "boo")).unwrap_err();
    assert!(err.is_not_exists());
    assert!(!store.is_node_exists(&Node::note("ghost.md", "")).unwrap());
}

#[test]
fn test_titles_are_normalized() {
    let (store, _temp) = store();
    store.create(&Node::note("/notes\\inbox.md", "x")).unwrap();
    assert!(store.is_node_exists(&Node::note("notes/inbox.md", "")).unwrap());

    let err = store.create(&Node::note("../escape.md", "x")).unwrap_err();
    assert!(matches!(err, NoteError::InvalidPath(_)));
}

#[test]
fn test_root_always_exists() {
    let (store, _temp) = store();
    assert!(store.is_node_exists(&Node::root()).unwrap());
}

#[test]
fn test_remove_directory_recursively() {
    let (store, _temp) = store();
    store.create(&Node::note("projects/a/one.md", "1")).unwrap();
    store.create(&Node::note("projects/a/b/two.md", "2")).unwrap();
    store.mkdir(&Node::folder("projects/empty")).unwrap();

    store.remove(&Node::folder("projects")).unwrap();

    assert!(!store.root_path().join("projects").exists());
    assert!(store.root_path().join(SETTINGS_TITLE).is_file());
}

#[test]
fn test_remove_missing_is_not_exists() {
    let (store, _temp) = store();
    let err = store.remove(&Node::note("nope.md", "")).unwrap_err();
    assert!(err.is_not_exists());
}

#[cfg(unix)]
#[test]
fn test_remove_stops_at_failing_descendant() {
    use std::os::unix::fs::PermissionsExt;

    let (store, _temp) = store();
    store.create(&Node::note("docs/locked/inner.md", "x")).unwrap();
    store.create(&Node::note("docs/free.md", "y")).unwrap();

    let locked = store.root_path().join("docs/locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

    // Privileged users ignore directory permissions; nothing to observe then.
    let probe = locked.join("probe");
    if fs::write(&probe, "").is_ok() {
        fs::remove_file(&probe).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = store.remove(&Node::folder("docs"));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let err = result.unwrap_err();
    assert!(err.to_string().contains("docs/locked"), "{}", err);
    assert!(store.root_path().join("docs").is_dir());
    assert!(store.root_path().join("docs/locked/inner.md").is_file());
}

#[test]
fn test_rename_checks_in_order() {
    let (store, _temp) = store();
    store.create(&Node::note("a.md", "a")).unwrap();
    store.create(&Node::note("b.md", "b")).unwrap();

    let missing = EditNode::new(Node::note("zzz.md", ""), Node::note("zzz.md", ""));
    assert!(store.rename(&missing).unwrap_err().is_not_exists());

    let same = EditNode::new(Node::note("a.md", ""), Node::note("a.md", ""));
    assert!(matches!(store.rename(&same).unwrap_err(), NoteError::SameTitles(_)));

    let same_after_normalizing =
        EditNode::new(Node::note("a.md", ""), Node::note("/a.md/", ""));
    assert!(matches!(
        store.rename(&same_after_normalizing).unwrap_err(),
        NoteError::SameTitles(_)
    ));

    let taken = EditNode::new(Node::note("a.md", ""), Node::note("b.md", ""));
    assert!(matches!(
        store.rename(&taken).unwrap_err(),
        NoteError::AlreadyExists(_)
    ));
}

#[test]
fn test_rename_moves_directory_with_content() {
    let (store, _temp) = store();
    store.create(&Node::note("old/note.md", "body")).unwrap();

    let edit = EditNode::new(Node::folder("old"), Node::folder("archive/new"));
    store.rename(&edit).unwrap();

    assert!(!store.is_node_exists(&Node::folder("old")).unwrap());
    let moved = store.view(&Node::note("archive/new/note.md", "")).unwrap();
    assert_eq!(moved.body, "body");
}

#[test]
fn test_get_all_filters_and_errors() {
    let (store, _temp) = store();
    store.create(&Node::note("todo/today.md", "t")).unwrap();
    store.create(&Node::note("todo/later.md", "l")).unwrap();
    store.create(&Node::note("scratch.md", "s")).unwrap();

    let all = store.get_all("", None, store.reserved()).unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.nodes.iter().all(|n| n.title != SETTINGS_TITLE));
    let today = all.nodes.iter().find(|n| n.title == "todo/today.md").unwrap();
    assert_eq!(today.body, "t");

    let dirs = store
        .get_all("", Some(NodeKind::Directory), store.reserved())
        .unwrap();
    assert_eq!(dirs.len(), 1);
    assert_eq!(dirs.nodes[0].title, "todo");

    let sub = store.get_all("todo", None, store.reserved()).unwrap();
    assert_eq!(sub.len(), 2);

    let ignore = IgnoreSet::with_extra(["todo"]);
    let rest = store.get_all("", None, &ignore).unwrap();
    assert_eq!(rest.len(), 1);
    assert_eq!(rest.nodes[0].title, "scratch.md");

    assert!(matches!(
        store.get_all("scratch.md", None, store.reserved()).unwrap_err(),
        NoteError::InvalidPath(_)
    ));
    assert!(store
        .get_all("missing", None, store.reserved())
        .unwrap_err()
        .is_not_exists());
}

#[test]
fn test_get_all_on_fresh_store_is_empty_working_directory() {
    let (store, _temp) = store();
    let err = store.get_all("", None, store.reserved()).unwrap_err();
    assert!(err.is_empty_working_directory());
}

#[test]
fn test_clear_nodes_keeps_settings() {
    let (store, _temp) = store();
    store.create(&Node::note("a/b/c.md", "c")).unwrap();
    store.create(&Node::note("d.md", "d")).unwrap();

    let (removed, errors) = store.clear_nodes();
    assert!(errors.is_empty(), "{:?}", errors);
    assert!(!removed.is_empty());

    assert!(store
        .get_all("", None, store.reserved())
        .unwrap_err()
        .is_empty_working_directory());
    assert!(store.settings().is_ok());
}

#[test]
fn test_remove_in_order_keeps_what_follows_a_failing_descendant() {
    let temp_dir = TempDir::new().unwrap();
    let local = LocalStore::new(temp_dir.path().join("notes"));
    local.init().unwrap();
    local.create(&Node::note("docs/locked/inner.md", "x")).unwrap();
    local.create(&Node::note("docs/free.md", "y")).unwrap();
    let store = RecordingStore::failing_remove(local, "docs/locked");

    let descendants = store.get_all("docs", None, store.reserved()).unwrap().nodes;
    let err = remove_in_order(descendants, |node| store.remove(node)).unwrap_err();

    assert!(err.to_string().contains("docs/locked"), "{}", err);
    assert_eq!(
        store.calls(),
        vec!["remove docs/locked/inner.md", "remove docs/free.md", "remove docs/locked"]
    );
    let root = store.inner().root_path();
    assert!(root.join("docs/locked").is_dir());
    assert!(!root.join("docs/locked/inner.md").exists());
    assert!(!root.join("docs/free.md").exists());
}

#[test]
fn test_clear_nodes_reports_a_failing_node_once() {
    let temp_dir = TempDir::new().unwrap();
    let local = LocalStore::new(temp_dir.path().join("notes"));
    local.init().unwrap();
    local.create(&Node::note("docs/locked.md", "x")).unwrap();
    local.create(&Node::note("docs/ok.md", "y")).unwrap();
    local.create(&Node::note("top.md", "z")).unwrap();
    let store = RecordingStore::failing_remove(local, "docs/locked.md");

    let (removed, errors) = store.clear_nodes();

    assert_eq!(errors.len(), 1, "{:?}", errors);
    let mut removed: Vec<_> = removed.into_iter().map(|n| n.title).collect();
    removed.sort();
    assert_eq!(removed, vec!["docs/ok.md", "top.md"]);
    assert!(!store.calls().contains(&"remove docs".to_string()));
    assert!(store.inner().root_path().join("docs/locked.md").is_file());
}

#[test]
fn test_get_all_keeps_unreadable_files_apart() {
    let (store, _temp) = store();
    store.create(&Node::note("a.md", "a")).unwrap();
    store.create(&Node::note("dir/b.md", "b")).unwrap();
    fs::write(store.root_path().join("img.png"), [0xff, 0xfe, 0x00]).unwrap();

    let listing = store.get_all("", None, store.reserved()).unwrap();
    assert_eq!(listing.len(), 3);
    assert_eq!(listing.unreadable.len(), 1);
    assert_eq!(listing.unreadable[0].0.title, "img.png");
    assert!(listing.unreadable[0].1.to_string().contains("img.png"));

    let (removed, errors) = store.clear_nodes();
    assert!(errors.is_empty(), "{:?}", errors);
    assert_eq!(removed.len(), 4);
    assert!(!store.root_path().join("img.png").exists());
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_names_are_not_listed() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let (store, _temp) = store();
    store.create(&Node::note("a.md", "a")).unwrap();
    let odd = store.root_path().join(OsStr::from_bytes(b"caf\xe9.md"));
    if fs::write(&odd, "x").is_err() {
        // Some filesystems refuse names that are not UTF-8.
        return;
    }

    let listing = store.get_all("", None, store.reserved()).unwrap();
    let titles: Vec<_> = listing.nodes.iter().map(|n| n.title.as_str()).collect();
    assert_eq!(titles, vec!["a.md"]);
    assert!(listing.unreadable.is_empty());
}
