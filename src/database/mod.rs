//! SQLite storage for folders and bookmarks.
//!
//! [`Database`] owns the connection and brings the schema up to date when it
//! is opened. Managers borrow the connection:
//!
//! ```no_run
//! use bookmarks::database::Database;
//! use bookmarks::managers::folder_manager::{FolderManager, FolderManagerTrait};
//!
//! let db = Database::open("bookmarks.db").expect("failed to open database");
//! let folders = FolderManager::new(db.connection()).list_folders();
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
