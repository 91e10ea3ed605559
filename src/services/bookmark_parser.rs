//! Netscape bookmark file parser.
//!
//! Reads the HTML dialect every browser uses for bookmark export and turns it
//! into a flat, document-ordered list of [`NewBookmark`] entries. Folders are
//! registered through [`FolderManagerTrait::upsert_folder`] as their headers are
//! met, so every entry can be tagged with the id of its innermost folder.
//!
//! ```text
//! <DL><p>
//!     <DT><A HREF="http://a.com">A</A>
//!     <DT><H3>Work</H3>
//!     <DL><p>
//!         <DT><A HREF="http://b.com" ICON="data:...">B</A>
//!         <DD>Optional description of B
//!     </DL><p>
//! </DL><p>
//! ```
//!
//! Tokenizing is done by `scraper` (html5ever), which repairs the missing
//! closing tags real exports are full of. The resulting tree is walked as a
//! sequence of open/close edges while a [`FolderStack`] tracks the open folders.

use std::io::Read;

use ego_tree::iter::Edge;
use scraper::{ElementRef, Html};
use serde::Serialize;

use crate::managers::folder_manager::FolderManagerTrait;
use crate::types::bookmark::{FolderId, NewBookmark};
use crate::types::errors::ParseError;

/// A folder whose scope is currently open.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenFolder {
    id: FolderId,
    name: String,
}

/// Depth-ordered record of the folders open at the current point of the walk.
///
/// Each `<DL>` remembers the stack depth to restore when it closes. A `<DL>`
/// opened right after a folder header belongs to that folder, so closing it
/// pops exactly that folder; any other `<DL>` pops nothing.
#[derive(Debug, Default)]
pub struct FolderStack {
    open: Vec<OpenFolder>,
    scopes: Vec<usize>,
    /// The top folder was pushed by a header whose `<DL>` has not opened yet.
    pending: bool,
}

impl FolderStack {
    /// Id of the innermost open folder, `None` at root level.
    pub fn current(&self) -> Option<FolderId> {
        self.open.last().map(|f| f.id)
    }

    /// Names of the open folders from outermost to innermost.
    pub fn path(&self) -> Vec<&str> {
        self.open.iter().map(|f| f.name.as_str()).collect()
    }

    pub fn depth(&self) -> usize {
        self.open.len()
    }

    /// Closes a header that never received a list: it was an empty folder.
    fn close_pending(&mut self) {
        if self.pending {
            self.open.pop();
            self.pending = false;
        }
    }

    fn push_folder(&mut self, id: FolderId, name: String) {
        self.open.push(OpenFolder { id, name });
        self.pending = true;
    }

    fn open_scope(&mut self) {
        let restore = if self.pending {
            self.open.len() - 1
        } else {
            self.open.len()
        };
        self.scopes.push(restore);
        self.pending = false;
    }

    fn close_scope(&mut self) {
        if let Some(depth) = self.scopes.pop() {
            self.open.truncate(depth);
        }
        self.pending = false;
    }
}

/// A folder header the registry refused; its contents went to the enclosing folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFolder {
    pub name: String,
    pub reason: String,
}

/// Parses Netscape bookmark documents, registering folders as it goes.
pub struct BookmarkParser<'a, F: FolderManagerTrait + ?Sized> {
    folders: &'a mut F,
    skipped_folders: Vec<SkippedFolder>,
}

impl<'a, F: FolderManagerTrait + ?Sized> BookmarkParser<'a, F> {
    pub fn new(folders: &'a mut F) -> Self {
        Self {
            folders,
            skipped_folders: Vec::new(),
        }
    }

    /// Folders that could not be registered during the last parse, in document order.
    pub fn skipped_folders(&self) -> &[SkippedFolder] {
        &self.skipped_folders
    }

    /// Reads the whole stream and parses it.
    ///
    /// # Errors
    /// Returns [`ParseError::Read`] if the stream fails or is not valid UTF-8.
    /// Markup problems are never errors; unrecognized content is skipped.
    pub fn parse<R: Read>(&mut self, mut reader: R) -> Result<Vec<NewBookmark>, ParseError> {
        let mut source = String::new();
        reader.read_to_string(&mut source)?;
        Ok(self.parse_str(&source))
    }

    /// Parses an in-memory document.
    pub fn parse_str(&mut self, html: &str) -> Vec<NewBookmark> {
        let document = Html::parse_document(html);
        self.skipped_folders.clear();
        let mut stack = FolderStack::default();
        let mut entries = Vec::new();
        // Index of the last emitted link, while a following <DD> may still describe it.
        let mut describable: Option<usize> = None;

        for edge in document.tree.root().traverse() {
            match edge {
                Edge::Open(node) => {
                    let Some(element) = ElementRef::wrap(node) else {
                        continue;
                    };
                    match element.value().name() {
                        "h3" => {
                            describable = None;
                            self.enter_folder(element, &mut stack);
                        }
                        "a" => {
                            describable = None;
                            stack.close_pending();
                            if let Some(entry) = read_link(element, stack.current()) {
                                entries.push(entry);
                                describable = Some(entries.len() - 1);
                            }
                        }
                        "dd" => {
                            if let Some(index) = describable.take() {
                                let text = own_text(element);
                                if !text.is_empty() {
                                    entries[index].description = Some(text);
                                }
                            }
                        }
                        "dl" => {
                            describable = None;
                            stack.open_scope();
                        }
                        _ => {}
                    }
                }
                Edge::Close(node) => {
                    if ElementRef::wrap(node).is_some_and(|el| el.value().name() == "dl") {
                        describable = None;
                        stack.close_scope();
                    }
                }
            }
        }

        tracing::debug!(
            entries = entries.len(),
            skipped_folders = self.skipped_folders.len(),
            "parsed bookmark document"
        );
        entries
    }

    /// Handles a folder header: registers the folder and opens its scope.
    ///
    /// Headers without text are ignored. A failed upsert is recorded in
    /// [`Self::skipped_folders`] and the folder is not pushed, so its contents
    /// land in the enclosing folder.
    fn enter_folder(&mut self, header: ElementRef<'_>, stack: &mut FolderStack) {
        let name = header.text().collect::<String>().trim().to_string();
        if name.is_empty() {
            return;
        }

        stack.close_pending();
        let parent = stack.current();
        match self.folders.upsert_folder(&name, parent) {
            Ok(folder) => {
                tracing::debug!(id = folder.id, name = %folder.name, depth = stack.depth(), "entered folder");
                stack.push_folder(folder.id, folder.name);
            }
            Err(e) => {
                tracing::warn!(folder = %name, error = %e, "skipping folder, contents kept in parent");
                self.skipped_folders.push(SkippedFolder {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }
}

/// Builds an entry from a link marker. Links without a URL yield `None`.
fn read_link(anchor: ElementRef<'_>, folder_id: Option<FolderId>) -> Option<NewBookmark> {
    let url = anchor.value().attr("href").unwrap_or_default().trim();
    if url.is_empty() {
        return None;
    }

    let title = anchor.text().collect::<String>().trim().to_string();
    let icon = anchor
        .value()
        .attr("icon")
        .filter(|icon| !icon.is_empty())
        .map(str::to_string);

    Some(NewBookmark {
        title,
        url: url.to_string(),
        description: None,
        icon,
        folder_id,
    })
}

/// Text directly inside an element, ignoring nested elements.
fn own_text(element: ElementRef<'_>) -> String {
    element
        .children()
        .filter_map(|child| child.value().as_text())
        .map(|text| &**text)
        .collect::<String>()
        .trim()
        .to_string()
}
