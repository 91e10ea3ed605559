//! Bookmark import: parse a Netscape bookmark file and merge it into the store.
//!
//! URL is the identity of a bookmark. An entry whose URL is already stored
//! refreshes that record (title, description, icon, folder) and keeps its id;
//! any other entry creates a new record. Re-importing the same file therefore
//! creates nothing new.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Serialize;

use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::folder_manager::FolderManagerTrait;
use crate::services::bookmark_parser::{BookmarkParser, SkippedFolder};
use crate::types::bookmark::NewBookmark;
use crate::types::errors::{BookmarkError, ImportError};

/// What happened to a single entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    Created,
    Updated,
}

/// An entry that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEntry {
    pub title: String,
    pub url: String,
    pub reason: String,
}

/// Counts reported at the end of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub updated: usize,
    pub skipped: Vec<SkippedEntry>,
    /// Folder headers the registry refused. Their bookmarks are still
    /// imported, into the enclosing folder.
    pub skipped_folders: Vec<SkippedFolder>,
}

impl ImportReport {
    /// Number of entries that reached the store.
    pub fn imported(&self) -> usize {
        self.created + self.updated
    }
}

/// Creates or refreshes one bookmark, keyed by its URL.
pub fn merge_entry<B: BookmarkManagerTrait + ?Sized>(
    bookmarks: &mut B,
    entry: &NewBookmark,
) -> Result<MergeOutcome, BookmarkError> {
    match bookmarks.get_by_url(&entry.url)? {
        Some(mut existing) => {
            existing.merge_from(entry);
            bookmarks.update_bookmark(&existing)?;
            Ok(MergeOutcome::Updated)
        }
        None => {
            bookmarks.create_bookmark(entry)?;
            Ok(MergeOutcome::Created)
        }
    }
}

/// Merges parsed entries in order. A failing entry is recorded and skipped.
pub fn merge_entries<B: BookmarkManagerTrait + ?Sized>(
    bookmarks: &mut B,
    entries: &[NewBookmark],
) -> ImportReport {
    let mut report = ImportReport::default();

    for entry in entries {
        if entry.url.trim().is_empty() {
            continue;
        }
        match merge_entry(bookmarks, entry) {
            Ok(MergeOutcome::Created) => report.created += 1,
            Ok(MergeOutcome::Updated) => report.updated += 1,
            Err(e) => {
                tracing::warn!(title = %entry.title, url = %entry.url, error = %e, "failed to import bookmark");
                report.skipped.push(SkippedEntry {
                    title: entry.title.clone(),
                    url: entry.url.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Runs parse and merge against one folder registry and one bookmark store.
pub struct BookmarkImporter<'a, F: ?Sized, B: ?Sized> {
    folders: &'a mut F,
    bookmarks: &'a mut B,
}

impl<'a, F, B> BookmarkImporter<'a, F, B>
where
    F: FolderManagerTrait + ?Sized,
    B: BookmarkManagerTrait + ?Sized,
{
    pub fn new(folders: &'a mut F, bookmarks: &'a mut B) -> Self {
        Self { folders, bookmarks }
    }

    /// Imports a bookmark document from any reader.
    ///
    /// # Errors
    /// Only an unreadable stream aborts the import; entry failures end up in
    /// [`ImportReport::skipped`] and folder failures in
    /// [`ImportReport::skipped_folders`].
    pub fn import_reader<R: Read>(&mut self, reader: R) -> Result<ImportReport, ImportError> {
        let mut parser = BookmarkParser::new(&mut *self.folders);
        let entries = parser.parse(reader)?;
        let skipped_folders = parser.skipped_folders().to_vec();

        let mut report = merge_entries(&mut *self.bookmarks, &entries);
        report.skipped_folders = skipped_folders;
        tracing::info!(
            created = report.created,
            updated = report.updated,
            skipped = report.skipped.len(),
            skipped_folders = report.skipped_folders.len(),
            "import finished"
        );
        Ok(report)
    }

    /// Imports the bookmark file at `path`.
    pub fn import_file<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportReport, ImportError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ImportError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!(path = %path.display(), "importing bookmarks");
        self.import_reader(BufReader::new(file))
    }
}
