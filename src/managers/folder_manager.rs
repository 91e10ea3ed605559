//! Folder Manager.
//!
//! Implements `FolderManagerTrait`, the folder registry: CRUD for folders plus
//! the idempotent `upsert_folder` used while importing, backed by SQLite via
//! `rusqlite`.
//!
//! A folder is identified by its `(name, parent)` pair. At most one row exists
//! per pair; `upsert_folder` and the merge performed by `delete_folder` keep it
//! that way, and `create_folder`/`update_folder` refuse to break it.

use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;

use crate::types::bookmark::{Folder, FolderId};
use crate::types::errors::FolderError;

/// Trait defining folder registry operations.
pub trait FolderManagerTrait {
    /// Lists every folder ordered by name.
    fn list_folders(&self) -> Result<Vec<Folder>, FolderError>;
    fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, FolderError>;
    fn create_folder(&mut self, name: &str, parent_id: Option<FolderId>) -> Result<Folder, FolderError>;
    /// Renames and/or reparents a folder.
    fn update_folder(&mut self, folder: &Folder) -> Result<(), FolderError>;
    /// Deletes a folder. Its bookmarks and child folders move to the root level.
    fn delete_folder(&mut self, id: FolderId) -> Result<(), FolderError>;
    /// Returns the folder matching `(name, parent_id)` exactly, creating it if absent.
    ///
    /// The name is not validated; callers pass non-empty names.
    fn upsert_folder(&mut self, name: &str, parent_id: Option<FolderId>) -> Result<Folder, FolderError>;
}

/// Folder manager backed by a SQLite connection.
pub struct FolderManager<'a> {
    conn: &'a Connection,
}

impl<'a> FolderManager<'a> {
    /// Creates a new `FolderManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn row_to_folder(row: &rusqlite::Row) -> rusqlite::Result<Folder> {
        Ok(Folder {
            id: row.get(0)?,
            name: row.get(1)?,
            parent_id: row.get(2)?,
        })
    }

    /// Finds the folder with exactly this name under exactly this parent.
    ///
    /// `parent_id IS ?2` makes a NULL parent match only NULL.
    fn find(&self, name: &str, parent_id: Option<FolderId>) -> Result<Option<Folder>, FolderError> {
        let folder = self
            .conn
            .query_row(
                "SELECT id, name, parent_id FROM folders \
                 WHERE name = ?1 AND parent_id IS ?2 ORDER BY id LIMIT 1",
                params![name, parent_id],
                Self::row_to_folder,
            )
            .optional()?;
        Ok(folder)
    }

    fn insert(&self, name: &str, parent_id: Option<FolderId>) -> Result<Folder, FolderError> {
        self.conn.execute(
            "INSERT INTO folders (name, parent_id) VALUES (?1, ?2)",
            params![name, parent_id],
        )?;
        Ok(Folder {
            id: self.conn.last_insert_rowid(),
            name: name.to_string(),
            parent_id,
        })
    }

    fn children(&self, parent_id: FolderId) -> Result<Vec<Folder>, FolderError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, parent_id FROM folders WHERE parent_id = ?1 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![parent_id], Self::row_to_folder)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    /// Fails with `Cycle` if `parent_id` is `folder_id` or lies below it.
    fn ensure_not_descendant(&self, folder_id: FolderId, parent_id: FolderId) -> Result<(), FolderError> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id);
        while let Some(id) = current {
            if id == folder_id {
                return Err(FolderError::Cycle {
                    folder: folder_id,
                    parent: parent_id,
                });
            }
            // Stored data may already loop; stop instead of spinning.
            if !seen.insert(id) {
                break;
            }
            current = match self.get_folder(id)? {
                Some(folder) => folder.parent_id,
                None => return Err(FolderError::NotFound(id)),
            };
        }
        Ok(())
    }

    /// Moves `child` under `parent_id`, folding it into an existing sibling of the
    /// same name instead of creating a duplicate `(name, parent)` pair.
    fn reattach(&self, child: &Folder, parent_id: Option<FolderId>) -> Result<(), FolderError> {
        match self.find(&child.name, parent_id)? {
            Some(existing) if existing.id != child.id => self.merge_into(child.id, existing.id),
            _ => {
                self.conn.execute(
                    "UPDATE folders SET parent_id = ?1 WHERE id = ?2",
                    params![parent_id, child.id],
                )?;
                Ok(())
            }
        }
    }

    /// Moves everything in `source` into `target`, then removes `source`.
    fn merge_into(&self, source: FolderId, target: FolderId) -> Result<(), FolderError> {
        tracing::debug!(source, target, "merging folder into existing sibling");
        self.conn.execute(
            "UPDATE bookmarks SET folder_id = ?1 WHERE folder_id = ?2",
            params![target, source],
        )?;
        for child in self.children(source)? {
            self.reattach(&child, Some(target))?;
        }
        self.conn
            .execute("DELETE FROM folders WHERE id = ?1", params![source])?;
        Ok(())
    }
}

impl<'a> FolderManagerTrait for FolderManager<'a> {
    fn list_folders(&self) -> Result<Vec<Folder>, FolderError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, parent_id FROM folders ORDER BY name, id")?;
        let rows = stmt.query_map([], Self::row_to_folder)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    fn get_folder(&self, id: FolderId) -> Result<Option<Folder>, FolderError> {
        let folder = self
            .conn
            .query_row(
                "SELECT id, name, parent_id FROM folders WHERE id = ?1",
                params![id],
                Self::row_to_folder,
            )
            .optional()?;
        Ok(folder)
    }

    /// Creates a new folder. Fails if the parent is missing or the pair is taken.
    fn create_folder(
        &mut self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Folder, FolderError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(FolderError::EmptyName);
        }
        if let Some(pid) = parent_id {
            if self.get_folder(pid)?.is_none() {
                return Err(FolderError::NotFound(pid));
            }
        }
        if self.find(name, parent_id)?.is_some() {
            return Err(FolderError::Duplicate(name.to_string()));
        }
        self.insert(name, parent_id)
    }

    fn update_folder(&mut self, folder: &Folder) -> Result<(), FolderError> {
        let name = folder.name.trim();
        if name.is_empty() {
            return Err(FolderError::EmptyName);
        }
        if self.get_folder(folder.id)?.is_none() {
            return Err(FolderError::NotFound(folder.id));
        }
        if let Some(pid) = folder.parent_id {
            self.ensure_not_descendant(folder.id, pid)?;
        }
        if let Some(existing) = self.find(name, folder.parent_id)? {
            if existing.id != folder.id {
                return Err(FolderError::Duplicate(name.to_string()));
            }
        }

        self.conn.execute(
            "UPDATE folders SET name = ?1, parent_id = ?2 WHERE id = ?3",
            params![name, folder.parent_id, folder.id],
        )?;
        Ok(())
    }

    /// Deletes a folder by ID.
    ///
    /// Bookmarks inside the folder are moved to root. Child folders are moved to
    /// root as well; a child whose name is already used by a root folder is merged
    /// into that folder.
    fn delete_folder(&mut self, id: FolderId) -> Result<(), FolderError> {
        if self.get_folder(id)?.is_none() {
            return Err(FolderError::NotFound(id));
        }

        let tx = self.conn.unchecked_transaction()?;
        self.conn.execute(
            "UPDATE bookmarks SET folder_id = NULL WHERE folder_id = ?1",
            params![id],
        )?;
        for child in self.children(id)? {
            self.reattach(&child, None)?;
        }
        self.conn
            .execute("DELETE FROM folders WHERE id = ?1", params![id])?;
        tx.commit()?;
        Ok(())
    }

    fn upsert_folder(
        &mut self,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Result<Folder, FolderError> {
        if let Some(existing) = self.find(name, parent_id)? {
            return Ok(existing);
        }
        let folder = self.insert(name, parent_id)?;
        tracing::debug!(id = folder.id, name, ?parent_id, "created folder");
        Ok(folder)
    }
}
