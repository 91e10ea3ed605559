//! Unit tests for importing bookmark files: merge by URL, re-import, and
//! per-entry failures.

use std::io::Write;

use bookmarks::app::App;
use bookmarks::database::Database;
use bookmarks::managers::bookmark_manager::{BookmarkManager, BookmarkManagerTrait};
use bookmarks::managers::folder_manager::{FolderManager, FolderManagerTrait};
use bookmarks::services::bookmark_importer::{merge_entries, merge_entry, BookmarkImporter, MergeOutcome};
use bookmarks::services::settings_engine::SettingsEngine;
use bookmarks::types::bookmark::{Bookmark, BookmarkId, Folder, FolderId, NewBookmark};
use bookmarks::types::errors::{BookmarkError, FolderError, ImportError};
use tempfile::{NamedTempFile, TempDir};

const DOCUMENT: &str = r#"<!DOCTYPE NETSCAPE-Bookmark-file-1>
<TITLE>Bookmarks</TITLE>
<H1>Bookmarks</H1>
<DL><p>
    <DT><A HREF="http://a.com">A</A>
    <DT><H3>Work</H3>
    <DL><p>
        <DT><A HREF="http://b.com">B</A>
        <DD>Second link
        <DT><A HREF="">No URL</A>
    </DL><p>
</DL><p>
"#;

fn setup() -> Database {
    Database::open_in_memory().expect("Failed to open in-memory database")
}

fn import(db: &Database, html: &str) -> bookmarks::services::bookmark_importer::ImportReport {
    let mut folders = FolderManager::new(db.connection());
    let mut bookmarks = BookmarkManager::new(db.connection());
    BookmarkImporter::new(&mut folders, &mut bookmarks)
        .import_reader(html.as_bytes())
        .expect("import should succeed")
}

#[test]
fn test_import_creates_bookmarks_and_folders() {
    let db = setup();
    let report = import(&db, DOCUMENT);

    assert_eq!(report.created, 2);
    assert_eq!(report.updated, 0);
    assert!(report.skipped.is_empty());
    assert_eq!(report.imported(), 2);

    let folders = FolderManager::new(db.connection()).list_folders().unwrap();
    assert_eq!(folders.len(), 1);
    let stored = BookmarkManager::new(db.connection()).list_bookmarks().unwrap();
    let b = stored.iter().find(|b| b.url == "http://b.com").unwrap();
    assert_eq!(b.folder_id, Some(folders[0].id));
    assert_eq!(b.description.as_deref(), Some("Second link"));
}

#[test]
fn test_reimport_updates_without_creating() {
    let db = setup();
    import(&db, DOCUMENT);
    let before: Vec<BookmarkId> = BookmarkManager::new(db.connection())
        .list_bookmarks()
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();

    let report = import(&db, DOCUMENT);
    assert_eq!(report.created, 0);
    assert_eq!(report.updated, 2);

    let after: Vec<BookmarkId> = BookmarkManager::new(db.connection())
        .list_bookmarks()
        .unwrap()
        .into_iter()
        .map(|b| b.id)
        .collect();
    assert_eq!(before, after);
    assert_eq!(FolderManager::new(db.connection()).list_folders().unwrap().len(), 1);
}

/// A known URL takes the title and folder of the newly imported entry.
#[test]
fn test_reimport_refreshes_existing_record() {
    let db = setup();
    import(&db, DOCUMENT);

    let moved = r#"<DL><p>
        <DT><H3>Archive</H3>
        <DL><p>
            <DT><A HREF="http://a.com" ICON="data:image/png;base64,AAAA">A renamed</A>
        </DL><p>
    </DL><p>"#;
    let report = import(&db, moved);
    assert_eq!((report.created, report.updated), (0, 1));

    let archive = FolderManager::new(db.connection())
        .list_folders()
        .unwrap()
        .into_iter()
        .find(|f| f.name == "Archive")
        .unwrap();
    let a = BookmarkManager::new(db.connection())
        .get_by_url("http://a.com")
        .unwrap()
        .unwrap();
    assert_eq!(a.title, "A renamed");
    assert_eq!(a.folder_id, Some(archive.id));
    assert_eq!(a.icon.as_deref(), Some("data:image/png;base64,AAAA"));
}

#[test]
fn test_duplicate_url_in_one_document_counts_as_update() {
    let db = setup();
    let html = r#"<DL><p>
        <DT><A HREF="http://same.com">First</A>
        <DT><A HREF="http://same.com">Second</A>
    </DL><p>"#;
    let report = import(&db, html);

    assert_eq!((report.created, report.updated), (1, 1));
    let stored = BookmarkManager::new(db.connection()).list_bookmarks().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "Second");
}

#[test]
fn test_merge_entry_outcomes() {
    let db = setup();
    let mut bookmarks = BookmarkManager::new(db.connection());
    let entry = NewBookmark::new("http://m.com", "M");

    assert_eq!(merge_entry(&mut bookmarks, &entry).unwrap(), MergeOutcome::Created);
    assert_eq!(merge_entry(&mut bookmarks, &entry).unwrap(), MergeOutcome::Updated);
}

/// Bookmark store that fails on one URL and records everything else.
#[derive(Default)]
struct PickyStore {
    stored: Vec<Bookmark>,
}

impl BookmarkManagerTrait for PickyStore {
    fn list_bookmarks(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        Ok(self.stored.clone())
    }

    fn list_bookmarks_in(&self, folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError> {
        Ok(self.stored.iter().filter(|b| b.folder_id == folder_id).cloned().collect())
    }

    fn get_bookmark(&self, id: BookmarkId) -> Result<Option<Bookmark>, BookmarkError> {
        Ok(self.stored.iter().find(|b| b.id == id).cloned())
    }

    fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError> {
        Ok(self.stored.iter().find(|b| b.url == url).cloned())
    }

    fn create_bookmark(&mut self, bookmark: &NewBookmark) -> Result<Bookmark, BookmarkError> {
        if bookmark.url.contains("broken") {
            return Err(BookmarkError::DatabaseError("constraint failed".to_string()));
        }
        let created = Bookmark {
            id: self.stored.len() as BookmarkId + 1,
            title: bookmark.title.clone(),
            url: bookmark.url.clone(),
            description: bookmark.description.clone(),
            icon: bookmark.icon.clone(),
            folder_id: bookmark.folder_id,
            folder_name: None,
        };
        self.stored.push(created.clone());
        Ok(created)
    }

    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError> {
        match self.stored.iter_mut().find(|b| b.id == bookmark.id) {
            Some(existing) => {
                *existing = bookmark.clone();
                Ok(())
            }
            None => Err(BookmarkError::NotFound(bookmark.id)),
        }
    }

    fn delete_bookmark(&mut self, id: BookmarkId) -> Result<(), BookmarkError> {
        self.stored.retain(|b| b.id != id);
        Ok(())
    }

    fn search_bookmarks(&self, _query: &str, _folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError> {
        Ok(self.stored.clone())
    }
}

#[test]
fn test_failed_entry_is_skipped_and_batch_continues() {
    let mut store = PickyStore::default();
    let entries = vec![
        NewBookmark::new("http://one.com", "One"),
        NewBookmark::new("http://broken.com", "Broken"),
        NewBookmark::new("", "Empty"),
        NewBookmark::new("http://two.com", "Two"),
    ];

    let report = merge_entries(&mut store, &entries);

    assert_eq!(report.created, 2);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].title, "Broken");
    assert_eq!(report.skipped[0].url, "http://broken.com");
    assert!(report.skipped[0].reason.contains("constraint failed"));
    assert_eq!(store.stored.len(), 2);
}

/// Folder registry that refuses one name and accepts everything else.
struct FlakyFolders {
    folders: Vec<Folder>,
    refuse: &'static str,
}

impl FolderManagerTrait for FlakyFolders {
    fn list_folders(&self) -> Result<Vec<Folder>, FolderError> {
        Ok(self.folders.clone())
    }

    fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, FolderError> {
        Ok(self.folders.iter().find(|f| f.id == id).cloned())
    }

    fn create_folder(&mut self, name: &str, parent_id: Option<FolderId>) -> Result<Folder, FolderError> {
        self.upsert_folder(name, parent_id)
    }

    fn update_folder(&mut self, _folder: &Folder) -> Result<(), FolderError> {
        Ok(())
    }

    fn delete_folder(&mut self, _id: FolderId) -> Result<(), FolderError> {
        Ok(())
    }

    fn upsert_folder(&mut self, name: &str, parent_id: Option<FolderId>) -> Result<Folder, FolderError> {
        if name == self.refuse {
            return Err(FolderError::DatabaseError("registry unavailable".to_string()));
        }
        let folder = Folder {
            id: self.folders.len() as FolderId + 1,
            name: name.to_string(),
            parent_id,
        };
        self.folders.push(folder.clone());
        Ok(folder)
    }
}

#[test]
fn test_refused_folder_is_reported() {
    let db = setup();
    let mut folders = FlakyFolders {
        folders: Vec::new(),
        refuse: "Broken",
    };
    let mut bookmarks = BookmarkManager::new(db.connection());
    let html = r#"<DL><p>
        <DT><H3>Broken</H3>
        <DL><p>
            <DT><A HREF="http://x.com">X</A>
        </DL><p>
    </DL><p>"#;

    let report = BookmarkImporter::new(&mut folders, &mut bookmarks)
        .import_reader(html.as_bytes())
        .unwrap();

    assert_eq!(report.created, 1);
    assert!(report.skipped.is_empty());
    assert_eq!(report.skipped_folders.len(), 1);
    assert_eq!(report.skipped_folders[0].name, "Broken");
    assert!(report.skipped_folders[0].reason.contains("registry unavailable"));

    let stored = bookmarks.get_by_url("http://x.com").unwrap().unwrap();
    assert_eq!(stored.folder_id, None);
}

#[test]
fn test_clean_import_reports_no_skipped_folders() {
    let db = setup();
    let report = import(&db, DOCUMENT);
    assert!(report.skipped_folders.is_empty());
}

#[test]
fn test_import_file_from_disk() {
    let db = setup();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(DOCUMENT.as_bytes()).unwrap();

    let mut folders = FolderManager::new(db.connection());
    let mut bookmarks = BookmarkManager::new(db.connection());
    let report = BookmarkImporter::new(&mut folders, &mut bookmarks)
        .import_file(file.path())
        .unwrap();
    assert_eq!(report.created, 2);
}

#[test]
fn test_import_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.html");
    let app = App::with_database(setup(), SettingsEngine::new(None));

    match app.import(&missing) {
        Err(ImportError::Open { path, .. }) => assert_eq!(path, missing),
        other => panic!("expected open error, got {:?}", other.map(|r| r.created)),
    }
}

#[test]
fn test_import_invalid_utf8_aborts() {
    let db = setup();
    let mut folders = FolderManager::new(db.connection());
    let mut bookmarks = BookmarkManager::new(db.connection());
    let bytes: &[u8] = &[0xc3, 0x28, 0xa0, 0xa1];

    let result = BookmarkImporter::new(&mut folders, &mut bookmarks).import_reader(bytes);
    assert!(matches!(result, Err(ImportError::Parse(_))));
}
