//! Bookmark export to the Netscape bookmark file format.
//!
//! Root bookmarks come first, then every folder depth-first: a folder's own
//! bookmarks (by title) before its sub-folders (by name). All text is
//! HTML-escaped so the output parses back to the same titles and URLs.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::managers::bookmark_manager::BookmarkManagerTrait;
use crate::managers::folder_manager::FolderManagerTrait;
use crate::services::folder_tree::{FolderTree, TreeEvent};
use crate::types::bookmark::{Bookmark, FolderId};
use crate::types::errors::ExportError;

const INDENT: &str = "    ";

/// Counts reported at the end of an export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub bookmarks: usize,
    pub folders: usize,
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Serializes the stored folder tree and bookmarks.
pub struct BookmarkExporter<'a, F: ?Sized, B: ?Sized> {
    folders: &'a F,
    bookmarks: &'a B,
    document_title: String,
}

impl<'a, F, B> BookmarkExporter<'a, F, B>
where
    F: FolderManagerTrait + ?Sized,
    B: BookmarkManagerTrait + ?Sized,
{
    pub fn new(folders: &'a F, bookmarks: &'a B) -> Self {
        Self {
            folders,
            bookmarks,
            document_title: "Bookmarks".to_string(),
        }
    }

    /// Sets the text of the `<TITLE>` and `<H1>` elements.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.document_title = title.into();
        self
    }

    /// Writes the export to `path`, replacing any existing file.
    pub fn export_to_file<P: AsRef<Path>>(&self, path: P) -> Result<ExportSummary, ExportError> {
        let path = path.as_ref();
        let mut out = BufWriter::new(File::create(path)?);
        let summary = self.export_to_writer(&mut out)?;
        out.flush()?;
        tracing::info!(path = %path.display(), bookmarks = summary.bookmarks, folders = summary.folders, "export finished");
        Ok(summary)
    }

    pub fn export_to_writer<W: Write>(&self, mut out: W) -> Result<ExportSummary, ExportError> {
        let tree = FolderTree::new(self.folders.list_folders()?);
        let bookmarks = self.bookmarks.list_bookmarks()?;

        // Bookmarks pointing at an unknown folder are written at root level.
        let mut by_folder: HashMap<Option<FolderId>, Vec<&Bookmark>> = HashMap::new();
        for bookmark in &bookmarks {
            let key = bookmark.folder_id.filter(|id| tree.get(*id).is_some());
            by_folder.entry(key).or_default().push(bookmark);
        }
        for group in by_folder.values_mut() {
            group.sort_by(|a, b| a.title.cmp(&b.title));
        }

        let title = escape_html(&self.document_title);
        writeln!(out, "<!DOCTYPE NETSCAPE-Bookmark-file-1>")?;
        writeln!(out, "<!-- This is an automatically generated file.")?;
        writeln!(out, "     It will be read and overwritten.")?;
        writeln!(out, "     DO NOT EDIT! -->")?;
        writeln!(out, "<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">")?;
        writeln!(out, "<TITLE>{}</TITLE>", title)?;
        writeln!(out, "<H1>{}</H1>", title)?;
        writeln!(out, "<DL><p>")?;

        let mut summary = ExportSummary::default();
        summary.bookmarks += write_bookmarks(&mut out, by_folder.get(&None), 1)?;

        for event in tree.walk() {
            match event {
                TreeEvent::Enter { folder, depth } => {
                    let indent = INDENT.repeat(depth + 1);
                    writeln!(out, "{}<DT><H3>{}</H3>", indent, escape_html(&folder.name))?;
                    writeln!(out, "{}<DL><p>", indent)?;
                    summary.folders += 1;
                    summary.bookmarks += write_bookmarks(&mut out, by_folder.get(&Some(folder.id)), depth + 2)?;
                }
                TreeEvent::Leave { depth, .. } => {
                    writeln!(out, "{}</DL><p>", INDENT.repeat(depth + 1))?;
                }
            }
        }

        writeln!(out, "</DL><p>")?;
        Ok(summary)
    }
}

fn write_bookmarks<W: Write>(
    out: &mut W,
    bookmarks: Option<&Vec<&Bookmark>>,
    level: usize,
) -> Result<usize, ExportError> {
    let Some(bookmarks) = bookmarks else {
        return Ok(0);
    };
    let indent = INDENT.repeat(level);
    for bookmark in bookmarks {
        write!(out, "{}<DT><A HREF=\"{}\"", indent, escape_html(&bookmark.url))?;
        if let Some(icon) = bookmark.icon.as_deref().filter(|i| !i.is_empty()) {
            write!(out, " ICON=\"{}\"", escape_html(icon))?;
        }
        writeln!(out, ">{}</A>", escape_html(&bookmark.title))?;
        if let Some(description) = bookmark.description.as_deref().filter(|d| !d.trim().is_empty()) {
            writeln!(out, "{}<DD>{}", indent, escape_html(description))?;
        }
    }
    Ok(bookmarks.len())
}
