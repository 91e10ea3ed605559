//! Removes bookmarks that share a URL with an earlier bookmark.
//!
//! Bookmarks are visited in listing order (title, then id); the first one seen
//! for each URL is kept.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;

use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::types::bookmark::BookmarkId;
use crate::types::errors::BookmarkError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub duplicates_found: usize,
    pub deleted: usize,
}

/// A bookmark scheduled for removal and the one that survives in its place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    pub id: BookmarkId,
    pub title: String,
    pub kept: BookmarkId,
}

/// Lists the duplicates without deleting anything.
pub fn find_duplicates<B: BookmarkManagerTrait + ?Sized>(
    bookmarks: &B,
) -> Result<Vec<Duplicate>, BookmarkError> {
    let mut first_seen: HashMap<String, BookmarkId> = HashMap::new();
    let mut duplicates = Vec::new();

    for bookmark in bookmarks.list_bookmarks()? {
        match first_seen.entry(bookmark.url) {
            Entry::Occupied(kept) => duplicates.push(Duplicate {
                id: bookmark.id,
                title: bookmark.title,
                kept: *kept.get(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(bookmark.id);
            }
        }
    }
    Ok(duplicates)
}

/// Deletes every duplicate. Individual delete failures are logged and skipped.
pub fn clear_duplicates<B: BookmarkManagerTrait + ?Sized>(
    bookmarks: &mut B,
) -> Result<CleanupReport, BookmarkError> {
    let duplicates = find_duplicates(&*bookmarks)?;
    let mut report = CleanupReport {
        duplicates_found: duplicates.len(),
        deleted: 0,
    };

    for duplicate in duplicates {
        tracing::debug!(id = duplicate.id, kept = duplicate.kept, title = %duplicate.title, "deleting duplicate");
        match bookmarks.delete_bookmark(duplicate.id) {
            Ok(()) => report.deleted += 1,
            Err(e) => {
                tracing::warn!(id = duplicate.id, title = %duplicate.title, error = %e, "failed to delete duplicate");
            }
        }
    }

    tracing::info!(found = report.duplicates_found, deleted = report.deleted, "duplicate cleanup finished");
    Ok(report)
}
