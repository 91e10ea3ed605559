//! In-memory view of the folder hierarchy.
//!
//! Built from a flat folder list; used by the exporter and by the console
//! tree printer. Folders whose parent does not exist are treated as root
//! folders, and a walk never visits a folder twice even if stored parent links
//! loop.

use std::collections::{HashMap, HashSet};

use crate::types::bookmark::{Bookmark, Folder, FolderId, FolderItem};

/// One step of a depth-first walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent<'a> {
    Enter { folder: &'a Folder, depth: usize },
    Leave { folder: &'a Folder, depth: usize },
}

enum Step {
    Enter(FolderId, usize),
    Leave(FolderId, usize),
}

#[derive(Debug, Default)]
pub struct FolderTree {
    folders: HashMap<FolderId, Folder>,
    roots: Vec<FolderId>,
    children: HashMap<FolderId, Vec<FolderId>>,
}

impl FolderTree {
    pub fn new(folders: Vec<Folder>) -> Self {
        let folders: HashMap<FolderId, Folder> = folders.into_iter().map(|f| (f.id, f)).collect();
        let mut roots = Vec::new();
        let mut children: HashMap<FolderId, Vec<FolderId>> = HashMap::new();

        for folder in folders.values() {
            match folder.parent_id {
                Some(pid) if pid != folder.id && folders.contains_key(&pid) => {
                    children.entry(pid).or_default().push(folder.id);
                }
                Some(pid) if pid != folder.id => {
                    tracing::debug!(id = folder.id, parent = pid, "folder parent missing, treating as root");
                    roots.push(folder.id);
                }
                _ => roots.push(folder.id),
            }
        }

        let by_name = |a: &FolderId, b: &FolderId| {
            let (fa, fb) = (&folders[a], &folders[b]);
            fa.name.cmp(&fb.name).then(fa.id.cmp(&fb.id))
        };
        roots.sort_by(by_name);
        for ids in children.values_mut() {
            ids.sort_by(by_name);
        }

        Self {
            folders,
            roots,
            children,
        }
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn get(&self, id: FolderId) -> Option<&Folder> {
        self.folders.get(&id)
    }

    /// Direct sub-folders of `parent` (root folders for `None`), ordered by name.
    pub fn children_of(&self, parent: Option<FolderId>) -> Vec<&Folder> {
        let ids = match parent {
            Some(pid) => self.children.get(&pid).map(Vec::as_slice).unwrap_or_default(),
            None => self.roots.as_slice(),
        };
        ids.iter().map(|id| &self.folders[id]).collect()
    }

    /// Sub-folders followed by the given folder's bookmarks.
    pub fn items(&self, parent: Option<FolderId>, bookmarks: &[Bookmark]) -> Vec<FolderItem> {
        let mut items: Vec<FolderItem> = self
            .children_of(parent)
            .into_iter()
            .cloned()
            .map(FolderItem::Folder)
            .collect();
        items.extend(
            bookmarks
                .iter()
                .filter(|b| b.folder_id == parent)
                .cloned()
                .map(FolderItem::Bookmark),
        );
        items
    }

    /// Folder names from the outermost ancestor down to `id`.
    pub fn path(&self, id: FolderId) -> Vec<&str> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.folders.get(&id);
        while let Some(folder) = current {
            if !seen.insert(folder.id) {
                break;
            }
            names.push(folder.name.as_str());
            current = folder.parent_id.and_then(|pid| self.folders.get(&pid));
        }
        names.reverse();
        names
    }

    /// Depth-first walk: each folder is entered, then its children in name order,
    /// then left. Every folder appears exactly once.
    pub fn walk(&self) -> Vec<TreeEvent<'_>> {
        let mut events = Vec::with_capacity(self.folders.len() * 2);
        let mut visited = HashSet::new();

        for &root in &self.roots {
            self.walk_from(root, &mut visited, &mut events);
        }

        // Folders caught in a stored parent loop are unreachable from any root.
        let mut stranded: Vec<&Folder> = self
            .folders
            .values()
            .filter(|f| !visited.contains(&f.id))
            .collect();
        stranded.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        for folder in stranded {
            self.walk_from(folder.id, &mut visited, &mut events);
        }

        events
    }

    fn walk_from<'a>(
        &'a self,
        start: FolderId,
        visited: &mut HashSet<FolderId>,
        events: &mut Vec<TreeEvent<'a>>,
    ) {
        let mut work = vec![Step::Enter(start, 0)];
        while let Some(step) = work.pop() {
            match step {
                Step::Enter(id, depth) => {
                    if !visited.insert(id) {
                        continue;
                    }
                    let folder = &self.folders[&id];
                    events.push(TreeEvent::Enter { folder, depth });
                    work.push(Step::Leave(id, depth));
                    if let Some(children) = self.children.get(&id) {
                        for &child in children.iter().rev() {
                            work.push(Step::Enter(child, depth + 1));
                        }
                    }
                }
                Step::Leave(id, depth) => {
                    events.push(TreeEvent::Leave {
                        folder: &self.folders[&id],
                        depth,
                    });
                }
            }
        }
    }
}
