use serde::{Deserialize, Serialize};

/// Row id of a persisted folder.
pub type FolderId = i64;

/// Row id of a persisted bookmark.
pub type BookmarkId = i64;

/// Represents a saved bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    /// Opaque icon payload, usually a `data:` URI.
    pub icon: Option<String>,
    pub folder_id: Option<FolderId>,
    /// Name of the owning folder. Filled by listing queries, never written.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_name: Option<String>,
}

/// A bookmark that has not been persisted yet.
///
/// This is both the parser's output entry and the input for creating a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub folder_id: Option<FolderId>,
}

impl NewBookmark {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn in_folder(mut self, folder_id: Option<FolderId>) -> Self {
        self.folder_id = folder_id;
        self
    }
}

impl Bookmark {
    /// Overwrites the mutable content of this record with `entry`, keeping the id.
    pub fn merge_from(&mut self, entry: &NewBookmark) {
        self.title = entry.title.clone();
        self.description = entry.description.clone();
        self.icon = entry.icon.clone();
        self.folder_id = entry.folder_id;
        self.folder_name = None;
    }
}

/// Represents a folder for organizing bookmarks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
}

/// A single entry of a folder listing: either a sub-folder or a bookmark.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FolderItem {
    Folder(Folder),
    Bookmark(Bookmark),
}
