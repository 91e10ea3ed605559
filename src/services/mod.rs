// Services
// Import, export and maintenance operations built on the managers, plus settings.

pub mod bookmark_exporter;
pub mod bookmark_importer;
pub mod bookmark_parser;
pub mod duplicate_cleaner;
pub mod folder_tree;
pub mod icon;
pub mod settings_engine;
