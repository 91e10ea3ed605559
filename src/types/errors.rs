use std::fmt;
use std::io;
use std::path::PathBuf;

use super::bookmark::{BookmarkId, FolderId};

// === FolderError ===

/// Errors related to folder registry operations.
#[derive(Debug)]
pub enum FolderError {
    /// Folder with the given ID was not found.
    NotFound(FolderId),
    /// Folder names must not be empty.
    EmptyName,
    /// A folder with the same name already exists under the same parent.
    Duplicate(String),
    /// The requested parent would make the folder its own ancestor.
    Cycle { folder: FolderId, parent: FolderId },
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for FolderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderError::NotFound(id) => write!(f, "Folder not found: {}", id),
            FolderError::EmptyName => write!(f, "Folder name cannot be empty"),
            FolderError::Duplicate(name) => write!(f, "Folder already exists: {}", name),
            FolderError::Cycle { folder, parent } => write!(
                f,
                "Folder {} cannot be moved under its own descendant {}",
                folder, parent
            ),
            FolderError::DatabaseError(msg) => write!(f, "Folder database error: {}", msg),
        }
    }
}

impl std::error::Error for FolderError {}

impl From<rusqlite::Error> for FolderError {
    fn from(error: rusqlite::Error) -> Self {
        FolderError::DatabaseError(error.to_string())
    }
}

// === BookmarkError ===

/// Errors related to bookmark store operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// Bookmark with the given ID was not found.
    NotFound(BookmarkId),
    /// Bookmarks without a URL are never persisted.
    EmptyUrl,
    /// The target folder was not found.
    FolderNotFound(FolderId),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::NotFound(id) => write!(f, "Bookmark not found: {}", id),
            BookmarkError::EmptyUrl => write!(f, "Bookmark URL cannot be empty"),
            BookmarkError::FolderNotFound(id) => write!(f, "Bookmark folder not found: {}", id),
            BookmarkError::DatabaseError(msg) => {
                write!(f, "Bookmark database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<rusqlite::Error> for BookmarkError {
    fn from(error: rusqlite::Error) -> Self {
        BookmarkError::DatabaseError(error.to_string())
    }
}

// === ParseError ===

/// Fatal errors of the bookmark document parser.
///
/// Markup problems are never fatal; only a stream that cannot be read as text is.
#[derive(Debug)]
pub enum ParseError {
    /// The input stream could not be read (I/O failure or invalid UTF-8).
    Read(io::Error),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Read(e) => write!(f, "Failed to read bookmark document: {}", e),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Read(e) => Some(e),
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(error: io::Error) -> Self {
        ParseError::Read(error)
    }
}

// === ImportError ===

/// Errors that abort a whole import.
#[derive(Debug)]
pub enum ImportError {
    /// The bookmark file could not be opened.
    Open { path: PathBuf, source: io::Error },
    /// The bookmark document could not be parsed.
    Parse(ParseError),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Open { path, source } => {
                write!(f, "Cannot open {}: {}", path.display(), source)
            }
            ImportError::Parse(e) => write!(f, "Failed to parse bookmark file: {}", e),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Open { source, .. } => Some(source),
            ImportError::Parse(e) => Some(e),
        }
    }
}

impl From<ParseError> for ImportError {
    fn from(error: ParseError) -> Self {
        ImportError::Parse(error)
    }
}

// === ExportError ===

/// Errors related to exporting bookmarks.
#[derive(Debug)]
pub enum ExportError {
    /// Writing the output failed.
    Io(io::Error),
    /// Folders could not be listed.
    Folder(FolderError),
    /// Bookmarks could not be listed.
    Bookmark(BookmarkError),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "Export I/O error: {}", e),
            ExportError::Folder(e) => write!(f, "Export failed to load folders: {}", e),
            ExportError::Bookmark(e) => write!(f, "Export failed to load bookmarks: {}", e),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            ExportError::Folder(e) => Some(e),
            ExportError::Bookmark(e) => Some(e),
        }
    }
}

impl From<io::Error> for ExportError {
    fn from(error: io::Error) -> Self {
        ExportError::Io(error)
    }
}

impl From<FolderError> for ExportError {
    fn from(error: FolderError) -> Self {
        ExportError::Folder(error)
    }
}

impl From<BookmarkError> for ExportError {
    fn from(error: BookmarkError) -> Self {
        ExportError::Bookmark(error)
    }
}

// === IconError ===

/// Errors related to decoding inline icon payloads.
#[derive(Debug, PartialEq, Eq)]
pub enum IconError {
    /// The payload is not a `data:` URI.
    NotDataUri,
    /// The `data:` URI is not base64 encoded.
    UnsupportedEncoding(String),
    /// The base64 payload is invalid.
    Decode(String),
}

impl fmt::Display for IconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconError::NotDataUri => write!(f, "Icon is not a data URI"),
            IconError::UnsupportedEncoding(header) => {
                write!(f, "Unsupported icon encoding: {}", header)
            }
            IconError::Decode(msg) => write!(f, "Icon decode failed: {}", msg),
        }
    }
}

impl std::error::Error for IconError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
