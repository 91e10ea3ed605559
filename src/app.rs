//! App Core.
//!
//! Holds the database and the settings engine, and runs the operations the
//! command line exposes.

use std::path::{Path, PathBuf};

use crate::database::connection::Database;
use crate::managers::bookmark_manager::BookmarkManager;
use crate::managers::folder_manager::FolderManager;
use crate::services::bookmark_exporter::{BookmarkExporter, ExportSummary};
use crate::services::bookmark_importer::{BookmarkImporter, ImportReport};
use crate::services::duplicate_cleaner::{self, CleanupReport};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::errors::{BookmarkError, ExportError, ImportError};

/// Central application struct.
///
/// `FolderManager` and `BookmarkManager` are not stored because they borrow the
/// connection; `folders()` and `bookmarks()` create them on demand.
pub struct App {
    pub db: Database,
    pub settings_engine: SettingsEngine,
}

impl App {
    /// Opens the database with settings that have already been loaded.
    ///
    /// The database path is `db_path` if given, otherwise the one from the
    /// settings, otherwise the platform default. Its directory is created.
    pub fn open(
        db_path: Option<PathBuf>,
        settings_engine: SettingsEngine,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let db_path = db_path.unwrap_or_else(|| settings_engine.database_path());
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create database directory {}: {}", dir.display(), e))?;
        }
        let db = Database::open(&db_path)?;

        Ok(Self { db, settings_engine })
    }

    /// Wraps an already open database, e.g. an in-memory one.
    pub fn with_database(db: Database, settings_engine: SettingsEngine) -> Self {
        Self { db, settings_engine }
    }

    pub fn folders(&self) -> FolderManager<'_> {
        FolderManager::new(self.db.connection())
    }

    pub fn bookmarks(&self) -> BookmarkManager<'_> {
        BookmarkManager::new(self.db.connection())
    }

    /// Imports a Netscape bookmark file, merging by URL.
    pub fn import(&self, path: &Path) -> Result<ImportReport, ImportError> {
        let mut folders = self.folders();
        let mut bookmarks = self.bookmarks();
        BookmarkImporter::new(&mut folders, &mut bookmarks).import_file(path)
    }

    /// Exports everything to a Netscape bookmark file.
    pub fn export(&self, path: &Path) -> Result<ExportSummary, ExportError> {
        let folders = self.folders();
        let bookmarks = self.bookmarks();
        let title = &self.settings_engine.get_settings().export.document_title;
        BookmarkExporter::new(&folders, &bookmarks)
            .with_title(title.as_str())
            .export_to_file(path)
    }

    /// Deletes bookmarks whose URL already belongs to another bookmark.
    pub fn clear_doubles(&self) -> Result<CleanupReport, BookmarkError> {
        duplicate_cleaner::clear_duplicates(&mut self.bookmarks())
    }
}
