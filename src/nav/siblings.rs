//! Sibling folders of the active folder and their boundary images
//!
//! Only the folders directly before and after the active one matter. For those
//! the viewer needs a single file each: the last image of the previous folder
//! and the first image of the next one.

use std::collections::{HashMap, HashSet};

use crate::drive::{DirectoryRecord, Edge, FileRecord, FolderPage};

/// Folders sharing the active folder's parent, in drive order
#[derive(Debug, Clone)]
pub struct SiblingFolders {
    grand_parent_id: String,
    folders: Vec<DirectoryRecord>,
    next_page_token: Option<String>,
    finished: bool,
}

impl SiblingFolders {
    pub fn new(grand_parent_id: impl Into<String>) -> Self {
        Self {
            grand_parent_id: grand_parent_id.into(),
            folders: Vec::new(),
            next_page_token: None,
            finished: false,
        }
    }

    pub fn grand_parent_id(&self) -> &str {
        &self.grand_parent_id
    }

    pub fn folders(&self) -> &[DirectoryRecord] {
        &self.folders
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    pub fn append_page(&mut self, page: FolderPage) {
        self.folders.extend(page.folders);
        self.finished = page.next_page_token.is_none();
        self.next_page_token = page.next_page_token;
    }

    pub fn get(&self, folder_id: &str) -> Option<&DirectoryRecord> {
        self.folders.iter().find(|f| f.id == folder_id)
    }

    /// Folders immediately before and after `folder_id`
    ///
    /// `None` while `folder_id` has not been listed yet. The following folder
    /// stays `None` until the next page arrives when `folder_id` is the last
    /// one loaded so far.
    pub fn neighbours(
        &self,
        folder_id: &str,
    ) -> Option<(Option<&DirectoryRecord>, Option<&DirectoryRecord>)> {
        let index = self.folders.iter().position(|f| f.id == folder_id)?;
        let prev = index.checked_sub(1).and_then(|i| self.folders.get(i));
        let next = self.folders.get(index + 1);
        Some((prev, next))
    }
}

/// Resolved boundary images, keyed by (folder, edge)
///
/// Entries are only meaningful for one grandparent; moving to a folder with a
/// different parent chain drops them all.
#[derive(Debug, Clone, Default)]
pub struct EdgeCache {
    grand_parent_id: Option<String>,
    /// `None` value = the folder has no images
    entries: HashMap<(String, Edge), Option<FileRecord>>,
    in_flight: HashSet<(String, Edge)>,
}

impl EdgeCache {
    pub fn grand_parent_id(&self) -> Option<&str> {
        self.grand_parent_id.as_deref()
    }

    /// Keep entries for `grand_parent_id`, drop everything else
    pub fn reset_for(&mut self, grand_parent_id: &str) {
        if self.grand_parent_id.as_deref() != Some(grand_parent_id) {
            self.clear();
            self.grand_parent_id = Some(grand_parent_id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.grand_parent_id = None;
        self.entries.clear();
        self.in_flight.clear();
    }

    /// Outer `None`: not resolved yet
    pub fn get(&self, folder_id: &str, edge: Edge) -> Option<Option<&FileRecord>> {
        self.entries
            .get(&(folder_id.to_string(), edge))
            .map(Option::as_ref)
    }

    /// Whether a fetch should be issued for this edge
    pub fn needs_fetch(&self, folder_id: &str, edge: Edge) -> bool {
        let key = (folder_id.to_string(), edge);
        !self.entries.contains_key(&key) && !self.in_flight.contains(&key)
    }

    pub fn mark_in_flight(&mut self, folder_id: &str, edge: Edge) {
        self.in_flight.insert((folder_id.to_string(), edge));
    }

    pub fn mark_failed(&mut self, folder_id: &str, edge: Edge) {
        self.in_flight.remove(&(folder_id.to_string(), edge));
    }

    pub fn insert(&mut self, folder_id: &str, edge: Edge, file: Option<FileRecord>) {
        let key = (folder_id.to_string(), edge);
        self.in_flight.remove(&key);
        self.entries.insert(key, file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::memory::image;

    fn folder(id: &str) -> DirectoryRecord {
        DirectoryRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent_id: Some("root".to_string()),
        }
    }

    #[test]
    fn test_neighbours() {
        let mut siblings = SiblingFolders::new("root");
        siblings.append_page(FolderPage {
            folders: vec![folder("a"), folder("b")],
            next_page_token: Some("2".into()),
        });

        let (prev, next) = siblings.neighbours("a").unwrap();
        assert!(prev.is_none());
        assert_eq!(next.map(|f| f.id.as_str()), Some("b"));

        // "b" is the last loaded folder: its follower is not known yet
        let (prev, next) = siblings.neighbours("b").unwrap();
        assert_eq!(prev.map(|f| f.id.as_str()), Some("a"));
        assert!(next.is_none());
        assert!(siblings.neighbours("c").is_none());

        siblings.append_page(FolderPage {
            folders: vec![folder("c")],
            next_page_token: None,
        });
        assert!(siblings.is_finished());
        let (_, next) = siblings.neighbours("b").unwrap();
        assert_eq!(next.map(|f| f.id.as_str()), Some("c"));
    }

    #[test]
    fn test_edge_cache_resolution() {
        let mut cache = EdgeCache::default();
        cache.reset_for("root");

        assert!(cache.needs_fetch("b", Edge::Begin));
        cache.mark_in_flight("b", Edge::Begin);
        assert!(!cache.needs_fetch("b", Edge::Begin));
        assert_eq!(cache.get("b", Edge::Begin), None);

        cache.insert("b", Edge::Begin, Some(image("b1", "b")));
        assert_eq!(
            cache.get("b", Edge::Begin).flatten().map(|f| f.id.as_str()),
            Some("b1")
        );

        cache.insert("empty", Edge::End, None);
        assert_eq!(cache.get("empty", Edge::End), Some(None));
    }

    #[test]
    fn test_edge_cache_invalidated_by_parent_chain() {
        let mut cache = EdgeCache::default();
        cache.reset_for("root");
        cache.insert("b", Edge::Begin, Some(image("b1", "b")));

        cache.reset_for("root");
        assert!(cache.get("b", Edge::Begin).is_some());

        cache.reset_for("elsewhere");
        assert!(cache.get("b", Edge::Begin).is_none());
        assert_eq!(cache.grand_parent_id(), Some("elsewhere"));
    }

    #[test]
    fn test_failed_edge_can_be_refetched() {
        let mut cache = EdgeCache::default();
        cache.mark_in_flight("b", Edge::End);
        cache.mark_failed("b", Edge::End);
        assert!(cache.needs_fetch("b", Edge::End));
    }
}
