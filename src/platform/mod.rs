// Platform-specific locations for the settings file and the bookmark database.
//
// Uses `cfg(target_os)` to pick the implementation at compile time.

use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

#[cfg(target_os = "linux")]
use linux as current;

#[cfg(target_os = "macos")]
use macos as current;

#[cfg(target_os = "windows")]
use windows as current;

/// File name of the database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "bookmarks.db";

/// Returns the directory holding `settings.json`.
///
/// - **Linux**: `~/.config/bookmarks` (or `$XDG_CONFIG_HOME/bookmarks`)
/// - **macOS**: `~/Library/Application Support/Bookmarks`
/// - **Windows**: `%APPDATA%/Bookmarks`
pub fn get_config_dir() -> PathBuf {
    current::get_config_dir()
}

/// Returns the directory holding the bookmark database.
///
/// - **Linux**: `~/.local/share/bookmarks` (or `$XDG_DATA_HOME/bookmarks`)
/// - **macOS**: `~/Library/Application Support/Bookmarks`
/// - **Windows**: `%APPDATA%/Bookmarks`
pub fn get_data_dir() -> PathBuf {
    current::get_data_dir()
}

/// Database location used when neither the command line nor the settings name one.
pub fn default_database_path() -> PathBuf {
    get_data_dir().join(DATABASE_FILE_NAME)
}
