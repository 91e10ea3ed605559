//! Bookmark Manager.
//!
//! Implements `BookmarkManagerTrait`, the bookmark store: CRUD operations for
//! bookmarks plus lookup by URL and substring search, backed by SQLite via
//! `rusqlite`.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::bookmark::{Bookmark, BookmarkId, FolderId, NewBookmark};
use crate::types::errors::BookmarkError;

/// Columns selected by every bookmark query, joined with the owning folder's name.
const BOOKMARK_COLUMNS: &str = "SELECT b.id, b.title, b.url, b.description, b.icon, b.folder_id, f.name \
     FROM bookmarks AS b LEFT JOIN folders AS f ON f.id = b.folder_id";

/// Trait defining bookmark store operations.
pub trait BookmarkManagerTrait {
    /// Lists all bookmarks with a non-empty URL, ordered by title.
    fn list_bookmarks(&self) -> Result<Vec<Bookmark>, BookmarkError>;
    /// Lists the bookmarks stored directly in a folder (or at root if `None`).
    fn list_bookmarks_in(&self, folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError>;
    fn get_bookmark(&self, id: BookmarkId) -> Result<Option<Bookmark>, BookmarkError>;
    /// Returns the oldest bookmark with exactly this URL.
    fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError>;
    fn create_bookmark(&mut self, bookmark: &NewBookmark) -> Result<Bookmark, BookmarkError>;
    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError>;
    fn delete_bookmark(&mut self, id: BookmarkId) -> Result<(), BookmarkError>;
    /// Case-insensitive substring search over title, URL and description.
    ///
    /// `folder_id` restricts the search to one folder; an empty query matches everything.
    fn search_bookmarks(&self, query: &str, folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Checks whether a folder with the given ID exists.
    fn folder_exists(&self, folder_id: FolderId) -> Result<bool, BookmarkError> {
        let exists: bool = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM folders WHERE id = ?1",
            params![folder_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn validate(&self, url: &str, folder_id: Option<FolderId>) -> Result<(), BookmarkError> {
        if url.trim().is_empty() {
            return Err(BookmarkError::EmptyUrl);
        }
        if let Some(fid) = folder_id {
            if !self.folder_exists(fid)? {
                return Err(BookmarkError::FolderNotFound(fid));
            }
        }
        Ok(())
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            title: row.get(1)?,
            url: row.get(2)?,
            description: row.get(3)?,
            icon: row.get(4)?,
            folder_id: row.get(5)?,
            folder_name: row.get(6)?,
        })
    }

    fn query_list<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<Bookmark>, BookmarkError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, Self::row_to_bookmark)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

impl<'a> BookmarkManagerTrait for BookmarkManager<'a> {
    fn list_bookmarks(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        self.query_list(
            &format!("{} WHERE b.url <> '' ORDER BY b.title, b.id", BOOKMARK_COLUMNS),
            [],
        )
    }

    fn list_bookmarks_in(&self, folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError> {
        self.query_list(
            &format!(
                "{} WHERE b.url <> '' AND b.folder_id IS ?1 ORDER BY b.title, b.id",
                BOOKMARK_COLUMNS
            ),
            params![folder_id],
        )
    }

    fn get_bookmark(&self, id: BookmarkId) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmark = self
            .conn
            .query_row(
                &format!("{} WHERE b.id = ?1", BOOKMARK_COLUMNS),
                params![id],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    fn get_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError> {
        let bookmark = self
            .conn
            .query_row(
                &format!("{} WHERE b.url = ?1 ORDER BY b.id LIMIT 1", BOOKMARK_COLUMNS),
                params![url],
                Self::row_to_bookmark,
            )
            .optional()?;
        Ok(bookmark)
    }

    /// Adds a new bookmark and returns the stored record.
    fn create_bookmark(&mut self, bookmark: &NewBookmark) -> Result<Bookmark, BookmarkError> {
        self.validate(&bookmark.url, bookmark.folder_id)?;

        self.conn.execute(
            "INSERT INTO bookmarks (title, url, description, icon, folder_id) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                bookmark.title,
                bookmark.url,
                bookmark.description,
                bookmark.icon,
                bookmark.folder_id
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        self.get_bookmark(id)?.ok_or(BookmarkError::NotFound(id))
    }

    /// Overwrites every stored field of an existing bookmark.
    fn update_bookmark(&mut self, bookmark: &Bookmark) -> Result<(), BookmarkError> {
        self.validate(&bookmark.url, bookmark.folder_id)?;

        let affected = self.conn.execute(
            "UPDATE bookmarks SET title = ?1, url = ?2, description = ?3, icon = ?4, folder_id = ?5 WHERE id = ?6",
            params![
                bookmark.title,
                bookmark.url,
                bookmark.description,
                bookmark.icon,
                bookmark.folder_id,
                bookmark.id
            ],
        )?;

        if affected == 0 {
            return Err(BookmarkError::NotFound(bookmark.id));
        }
        Ok(())
    }

    /// Removes a bookmark by ID.
    fn delete_bookmark(&mut self, id: BookmarkId) -> Result<(), BookmarkError> {
        let affected = self
            .conn
            .execute("DELETE FROM bookmarks WHERE id = ?1", params![id])?;

        if affected == 0 {
            return Err(BookmarkError::NotFound(id));
        }
        Ok(())
    }

    fn search_bookmarks(&self, query: &str, folder_id: Option<FolderId>) -> Result<Vec<Bookmark>, BookmarkError> {
        let candidates = match folder_id {
            Some(fid) => self.list_bookmarks_in(Some(fid))?,
            None => self.list_bookmarks()?,
        };

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(candidates);
        }

        Ok(candidates
            .into_iter()
            .filter(|b| {
                contains_folded(&b.title, &needle)
                    || contains_folded(&b.url, &needle)
                    || b.description
                        .as_deref()
                        .is_some_and(|d| contains_folded(d, &needle))
            })
            .collect())
    }
}
