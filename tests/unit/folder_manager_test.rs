//! Unit tests for the FolderManager public API.
//!
//! Folder CRUD, the `(name, parent)` upsert used during import, and the
//! reparenting performed when a folder is deleted. All tests run against an
//! in-memory SQLite database.

use bookmarks::database::Database;
use bookmarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmarks::managers::folder_manager::{FolderManager, FolderManagerTrait};
use bookmarks::types::bookmark::NewBookmark;
use bookmarks::types::errors::FolderError;
use rstest::rstest;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

// === upsert_folder ===

#[test]
fn test_upsert_returns_same_folder_for_same_pair() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let first = mgr.upsert_folder("Work", None).unwrap();
    let second = mgr.upsert_folder("Work", None).unwrap();

    assert_eq!(first, second);
    assert_eq!(mgr.list_folders().unwrap().len(), 1);
}

/// A root folder and a nested folder with the same name are different folders.
#[test]
fn test_upsert_distinguishes_root_from_nested() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let work = mgr.upsert_folder("Work", None).unwrap();
    let nested = mgr.upsert_folder("Work", Some(work.id)).unwrap();

    assert_ne!(work.id, nested.id);
    assert_eq!(work.parent_id, None);
    assert_eq!(nested.parent_id, Some(work.id));
    assert_eq!(mgr.upsert_folder("Work", None).unwrap().id, work.id);
    assert_eq!(mgr.upsert_folder("Work", Some(work.id)).unwrap().id, nested.id);
}

#[test]
fn test_upsert_same_name_under_different_parents() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let a = mgr.upsert_folder("A", None).unwrap();
    let b = mgr.upsert_folder("B", None).unwrap();
    let docs_a = mgr.upsert_folder("Docs", Some(a.id)).unwrap();
    let docs_b = mgr.upsert_folder("Docs", Some(b.id)).unwrap();

    assert_ne!(docs_a.id, docs_b.id);
    assert_eq!(mgr.list_folders().unwrap().len(), 4);
}

#[test]
fn test_upsert_is_case_sensitive() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let lower = mgr.upsert_folder("news", None).unwrap();
    let upper = mgr.upsert_folder("News", None).unwrap();
    assert_ne!(lower.id, upper.id);
}

// === create / get / list ===

#[test]
fn test_create_and_get_folder() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let created = mgr.create_folder("  Reading  ", None).unwrap();
    assert_eq!(created.name, "Reading");

    let fetched = mgr.get_folder(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);
    assert!(mgr.get_folder(created.id + 100).unwrap().is_none());
}

#[rstest]
#[case("")]
#[case("   ")]
fn test_create_rejects_empty_name(#[case] name: &str) {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    assert!(matches!(mgr.create_folder(name, None), Err(FolderError::EmptyName)));
}

#[test]
fn test_create_rejects_missing_parent() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    assert!(matches!(
        mgr.create_folder("Child", Some(77)),
        Err(FolderError::NotFound(77))
    ));
}

#[test]
fn test_create_rejects_duplicate_pair() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    mgr.create_folder("Work", None).unwrap();
    assert!(matches!(
        mgr.create_folder("Work", None),
        Err(FolderError::Duplicate(name)) if name == "Work"
    ));
}

#[test]
fn test_list_folders_ordered_by_name() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    mgr.create_folder("Zeta", None).unwrap();
    mgr.create_folder("Alpha", None).unwrap();
    mgr.create_folder("Mid", None).unwrap();

    let names: Vec<String> = mgr.list_folders().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Alpha", "Mid", "Zeta"]);
}

// === update_folder ===

#[test]
fn test_rename_and_move_folder() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let work = mgr.create_folder("Work", None).unwrap();
    let mut notes = mgr.create_folder("Notes", None).unwrap();

    notes.name = "Meeting notes".to_string();
    notes.parent_id = Some(work.id);
    mgr.update_folder(&notes).unwrap();

    let stored = mgr.get_folder(notes.id).unwrap().unwrap();
    assert_eq!(stored.name, "Meeting notes");
    assert_eq!(stored.parent_id, Some(work.id));
}

#[test]
fn test_update_rejects_cycle() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let top = mgr.create_folder("Top", None).unwrap();
    let middle = mgr.create_folder("Middle", Some(top.id)).unwrap();
    let bottom = mgr.create_folder("Bottom", Some(middle.id)).unwrap();

    let mut moved = top.clone();
    moved.parent_id = Some(bottom.id);
    assert!(matches!(
        mgr.update_folder(&moved),
        Err(FolderError::Cycle { folder, parent }) if folder == top.id && parent == bottom.id
    ));

    let mut own_parent = top.clone();
    own_parent.parent_id = Some(top.id);
    assert!(matches!(mgr.update_folder(&own_parent), Err(FolderError::Cycle { .. })));
}

#[test]
fn test_update_rejects_duplicate_pair() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    mgr.create_folder("Work", None).unwrap();
    let mut other = mgr.create_folder("Other", None).unwrap();
    other.name = "Work".to_string();

    assert!(matches!(mgr.update_folder(&other), Err(FolderError::Duplicate(_))));
}

#[test]
fn test_update_missing_folder() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let mut ghost = mgr.create_folder("Ghost", None).unwrap();
    ghost.id += 10;
    assert!(matches!(mgr.update_folder(&ghost), Err(FolderError::NotFound(_))));
}

// === delete_folder ===

#[test]
fn test_delete_moves_bookmarks_to_root() {
    let db = setup();
    let mut folders = FolderManager::new(db.connection());
    let mut bookmarks = BookmarkManager::new(db.connection());

    let work = folders.create_folder("Work", None).unwrap();
    let bookmark = bookmarks
        .create_bookmark(&NewBookmark::new("https://work.example", "Work site").in_folder(Some(work.id)))
        .unwrap();

    folders.delete_folder(work.id).unwrap();

    assert!(folders.get_folder(work.id).unwrap().is_none());
    let stored = bookmarks.get_bookmark(bookmark.id).unwrap().unwrap();
    assert_eq!(stored.folder_id, None);
}

#[test]
fn test_delete_moves_children_to_root() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    let parent = mgr.create_folder("Parent", None).unwrap();
    let child = mgr.create_folder("Child", Some(parent.id)).unwrap();

    mgr.delete_folder(parent.id).unwrap();

    let stored = mgr.get_folder(child.id).unwrap().unwrap();
    assert_eq!(stored.parent_id, None);
}

/// A child whose name is already taken at root is merged into that root folder.
#[test]
fn test_delete_merges_child_into_existing_root_folder() {
    let db = setup();
    let mut folders = FolderManager::new(db.connection());
    let mut bookmarks = BookmarkManager::new(db.connection());

    let root_docs = folders.create_folder("Docs", None).unwrap();
    let parent = folders.create_folder("Parent", None).unwrap();
    let nested_docs = folders.create_folder("Docs", Some(parent.id)).unwrap();
    let grandchild = folders.create_folder("Drafts", Some(nested_docs.id)).unwrap();
    let bookmark = bookmarks
        .create_bookmark(&NewBookmark::new("https://docs.example", "Docs").in_folder(Some(nested_docs.id)))
        .unwrap();

    folders.delete_folder(parent.id).unwrap();

    assert!(folders.get_folder(nested_docs.id).unwrap().is_none());
    assert_eq!(
        bookmarks.get_bookmark(bookmark.id).unwrap().unwrap().folder_id,
        Some(root_docs.id)
    );
    assert_eq!(
        folders.get_folder(grandchild.id).unwrap().unwrap().parent_id,
        Some(root_docs.id)
    );
    let names: Vec<String> = folders.list_folders().unwrap().into_iter().map(|f| f.name).collect();
    assert_eq!(names, vec!["Docs", "Drafts"]);
}

#[test]
fn test_delete_missing_folder() {
    let db = setup();
    let mut mgr = FolderManager::new(db.connection());

    assert!(matches!(mgr.delete_folder(5), Err(FolderError::NotFound(5))));
}
