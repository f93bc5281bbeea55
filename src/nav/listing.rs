//! Paged image listing of one folder

use crate::drive::{FilePage, FileRecord};

/// Images of one folder, in drive order, filled page by page
#[derive(Debug, Clone, PartialEq)]
pub struct FolderListing {
    parent_id: String,
    files: Vec<FileRecord>,
    next_page_token: Option<String>,
    finished: bool,
}

impl FolderListing {
    pub fn new(parent_id: impl Into<String>) -> Self {
        Self {
            parent_id: parent_id.into(),
            files: Vec::new(),
            next_page_token: None,
            finished: false,
        }
    }

    pub fn parent_id(&self) -> &str {
        &self.parent_id
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FileRecord> {
        self.files.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.files.iter().position(|f| f.id == id)
    }

    /// True once the last page has been appended
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn next_page_token(&self) -> Option<&str> {
        self.next_page_token.as_deref()
    }

    /// Append a page; pages only ever extend the list
    pub fn append_page(&mut self, page: FilePage) {
        self.files.extend(page.files);
        self.finished = page.next_page_token.is_none();
        self.next_page_token = page.next_page_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::memory::image;

    #[test]
    fn test_pages_append_until_finished() {
        let mut listing = FolderListing::new("p");
        assert!(!listing.is_finished());
        assert!(listing.is_empty());

        listing.append_page(FilePage {
            files: vec![image("a", "p"), image("b", "p")],
            next_page_token: Some("2".into()),
        });
        assert!(!listing.is_finished());
        assert_eq!(listing.next_page_token(), Some("2"));

        listing.append_page(FilePage {
            files: vec![image("c", "p")],
            next_page_token: None,
        });
        assert!(listing.is_finished());
        assert_eq!(listing.len(), 3);
        assert_eq!(listing.index_of("c"), Some(2));
        assert_eq!(listing.index_of("z"), None);
        assert_eq!(listing.get(0).map(|f| f.id.as_str()), Some("a"));
    }
}
