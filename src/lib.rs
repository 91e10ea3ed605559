//! Bookmarks: a personal bookmark collection stored in SQLite, with import
//! and export of Netscape bookmark files (the HTML format browsers export).
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
