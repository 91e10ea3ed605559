//! Schema migrations for the bookmarks SQLite database.
//!
//! Applied versions are recorded in `schema_version`; opening a database runs
//! only the migrations it has not seen yet.

use rusqlite::Connection;

type Migration = fn(&Connection) -> Result<(), rusqlite::Error>;

/// Every migration in order: `(version, description, apply)`.
const MIGRATIONS: &[(i32, &str, Migration)] = &[
    (1, "Initial schema: folders and bookmarks", migration_v1),
    (2, "Add icon to bookmarks, index bookmark urls", migration_v2),
];

/// Version of the newest migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Highest applied migration, 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Enables foreign keys and applies the migrations newer than the stored
/// schema version. Safe to call on every open.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let applied = get_schema_version(conn);
    for &(version, description, apply) in MIGRATIONS.iter().filter(|m| m.0 > applied) {
        apply(conn)?;
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        conn.execute(
            "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![version, now, description],
        )?;
        tracing::debug!(version, description, "applied schema migration");
    }

    Ok(())
}

/// V1: Create the folder and bookmark tables.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS folders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            parent_id INTEGER,
            FOREIGN KEY (parent_id) REFERENCES folders(id)
        );

        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            url TEXT NOT NULL,
            description TEXT,
            folder_id INTEGER,
            FOREIGN KEY (folder_id) REFERENCES folders(id)
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_folder ON bookmarks(folder_id);
        CREATE INDEX IF NOT EXISTS idx_folders_parent ON folders(parent_id);
        "
    )
}

/// V2: Add the icon column for databases created before icons were stored.
fn migration_v2(conn: &Connection) -> Result<(), rusqlite::Error> {
    let has_icon: bool = conn.query_row(
        "SELECT COUNT(*) > 0 FROM pragma_table_info('bookmarks') WHERE name = 'icon'",
        [],
        |row| row.get(0),
    )?;
    if !has_icon {
        conn.execute_batch("ALTER TABLE bookmarks ADD COLUMN icon TEXT;")?;
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_bookmarks_url ON bookmarks(url);")
}
