//! Sled-backed store behavior, including persistence across reopen

use notebox::error::NoteError;
use notebox::node::{EditNode, Node, NodeKind, StoreKind};
use notebox::settings::SETTINGS_TITLE;
use notebox::store::{NodeStore, SledStore};
use tempfile::TempDir;

fn store() -> SledStore {
    let store = SledStore::temporary().unwrap();
    store.init().unwrap();
    store
}

#[test]
fn test_content_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let location = temp_dir.path().join("remote.db");

    {
        let store = SledStore::open(&location).unwrap();
        store.init().unwrap();
        store.create(&Node::note("journal/2024.md", "entry")).unwrap();
        store.flush().unwrap();
    }

    let store = SledStore::open(&location).unwrap();
    let node = store.view(&Node::note("journal/2024.md", "")).unwrap();
    assert_eq!(node.body, "entry");
    assert_eq!(
        store.view(&Node::folder("journal")).unwrap().kind,
        NodeKind::Directory
    );
    assert!(node.address(StoreKind::Sled).unwrap().contains("journal/2024.md"));
}

#[test]
fn test_create_under_file_is_invalid() {
    let store = store();
    store.create(&Node::note("plain.md", "x")).unwrap();

    let err = store.create(&Node::note("plain.md/child.md", "y")).unwrap_err();
    assert!(matches!(err, NoteError::InvalidPath(_)));
}

#[test]
fn test_edit_directory_is_invalid() {
    let store = store();
    store.mkdir(&Node::folder("dir")).unwrap();
    let err = store.edit(&Node::note("dir", "body")).unwrap_err();
    assert!(matches!(err, NoteError::InvalidPath(_)));
}

#[test]
fn test_remove_subtree_leaves_siblings() {
    let store = store();
    store.create(&Node::note("a/b/c.md", "c")).unwrap();
    store.create(&Node::note("ab.md", "sibling with shared prefix")).unwrap();

    store.remove(&Node::folder("a")).unwrap();

    assert!(!store.is_node_exists(&Node::folder("a")).unwrap());
    assert!(!store.is_node_exists(&Node::note("a/b/c.md", "")).unwrap());
    assert!(store.is_node_exists(&Node::note("ab.md", "")).unwrap());
}

#[test]
fn test_rename_rekeys_subtree() {
    let store = store();
    store.create(&Node::note("src/x.md", "x")).unwrap();
    store.create(&Node::note("src/deep/y.md", "y")).unwrap();

    store
        .rename(&EditNode::new(Node::folder("src"), Node::folder("dst")))
        .unwrap();

    assert_eq!(store.view(&Node::note("dst/x.md", "")).unwrap().body, "x");
    assert_eq!(store.view(&Node::note("dst/deep/y.md", "")).unwrap().body, "y");
    assert!(!store.is_node_exists(&Node::folder("src")).unwrap());
}

#[test]
fn test_rename_into_itself_is_rejected() {
    let store = store();
    store.mkdir(&Node::folder("box")).unwrap();

    let err = store
        .rename(&EditNode::new(Node::folder("box"), Node::folder("box/inner")))
        .unwrap_err();
    assert!(matches!(err, NoteError::InvalidPath(_)));
    assert!(store.is_node_exists(&Node::folder("box")).unwrap());
}

#[test]
fn test_get_all_hides_settings_and_keeps_empty_dirs() {
    let store = store();
    store.mkdir(&Node::folder("empty")).unwrap();

    let listing = store.get_all("", None, store.reserved()).unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing.nodes[0].title, "empty");
    assert!(listing.nodes.iter().all(|n| n.title != SETTINGS_TITLE));
}

#[test]
fn test_clear_nodes_keeps_settings() {
    let store = store();
    store.create(&Node::note("x/y.md", "y")).unwrap();

    let (removed, errors) = store.clear_nodes();
    assert!(errors.is_empty());
    assert_eq!(removed.len(), 2);
    assert!(store.settings().is_ok());
    assert!(store
        .get_all("", None, store.reserved())
        .unwrap_err()
        .is_empty_working_directory());
}

#[test]
fn test_rename_to_same_normalized_title() {
    let store = store();
    store.create(&Node::note("notes/a.md", "a")).unwrap();

    let err = store
        .rename(&EditNode::new(
            Node::note("notes/a.md", ""),
            Node::note("notes\\a.md", ""),
        ))
        .unwrap_err();
    assert!(matches!(err, NoteError::SameTitles(_)));
}
