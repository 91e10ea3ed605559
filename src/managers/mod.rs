// State managers
// Managers own the persisted records: folders and bookmarks.

pub mod bookmark_manager;
pub mod folder_manager;
