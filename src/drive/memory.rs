//! In-memory drive used by the navigation and session tests

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Mutex;

use super::{DirectoryRecord, DriveClient, Edge, FilePage, FileRecord, FolderPage};
use crate::error::DriveError;

#[derive(Default)]
pub(crate) struct MemoryDrive {
    folders: HashMap<String, DirectoryRecord>,
    /// Folder id -> sub-folder ids in order
    children: HashMap<String, Vec<String>>,
    /// Folder id -> images in order
    files: HashMap<String, Vec<FileRecord>>,
    page_size: usize,
    /// Folder ids whose file listing fails with a network error
    pub failing_listings: Mutex<HashSet<String>>,
    /// Every `list_files` call as (parent, token)
    pub listing_calls: Mutex<Vec<(String, Option<String>)>>,
}

pub(crate) fn image(id: &str, parent: &str) -> FileRecord {
    FileRecord {
        id: id.to_string(),
        name: format!("{}.jpg", id),
        parent_id: parent.to_string(),
        thumbnail_url: format!("thumb://{}", id),
        content_url: format!("content://{}", id),
        natural_width: Some(1600),
        natural_height: Some(1200),
    }
}

impl MemoryDrive {
    pub fn new(page_size: usize) -> Self {
        let mut drive = Self {
            page_size: page_size.max(1),
            ..Default::default()
        };
        drive.folders.insert(
            "root".to_string(),
            DirectoryRecord {
                id: "root".to_string(),
                name: "My Drive".to_string(),
                parent_id: None,
            },
        );
        drive
    }

    /// Add a folder under `parent` holding images with the given ids
    pub fn with_folder(mut self, id: &str, parent: &str, images: &[&str]) -> Self {
        self.folders.insert(
            id.to_string(),
            DirectoryRecord {
                id: id.to_string(),
                name: id.to_uppercase(),
                parent_id: Some(parent.to_string()),
            },
        );
        self.children
            .entry(parent.to_string())
            .or_default()
            .push(id.to_string());
        self.files.insert(
            id.to_string(),
            images.iter().map(|f| image(f, id)).collect(),
        );
        self
    }

    fn page<T: Clone>(&self, items: &[T], token: Option<&str>) -> (Vec<T>, Option<String>) {
        let start = token.and_then(|t| t.parse().ok()).unwrap_or(0usize).min(items.len());
        let end = (start + self.page_size).min(items.len());
        let next = (end < items.len()).then(|| end.to_string());
        (items[start..end].to_vec(), next)
    }

    fn find_file(&self, id: &str) -> Option<FileRecord> {
        self.files
            .values()
            .flat_map(|files| files.iter())
            .find(|f| f.id == id)
            .cloned()
    }
}

impl DriveClient for MemoryDrive {
    fn fetch_file(&self, id: &str) -> impl Future<Output = Result<FileRecord, DriveError>> + Send {
        let result = self
            .find_file(id)
            .ok_or_else(|| DriveError::NotFound(id.to_string()));
        async move { result }
    }

    fn list_files(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<FilePage, DriveError>> + Send {
        self.listing_calls
            .lock()
            .unwrap()
            .push((parent_id.to_string(), page_token.map(str::to_string)));

        let result = if self.failing_listings.lock().unwrap().contains(parent_id) {
            Err(DriveError::Network("listing unavailable".to_string()))
        } else {
            match self.files.get(parent_id) {
                Some(files) => {
                    let (files, next_page_token) = self.page(files, page_token);
                    Ok(FilePage {
                        files,
                        next_page_token,
                    })
                }
                None => Err(DriveError::NotFound(parent_id.to_string())),
            }
        };
        async move { result }
    }

    fn fetch_parent(&self, id: &str) -> impl Future<Output = Result<DirectoryRecord, DriveError>> + Send {
        let result = self
            .folders
            .get(id)
            .cloned()
            .ok_or_else(|| DriveError::NotFound(id.to_string()));
        async move { result }
    }

    fn list_sibling_folders(
        &self,
        grand_parent_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<FolderPage, DriveError>> + Send {
        let ids = self.children.get(grand_parent_id).cloned().unwrap_or_default();
        let records: Vec<DirectoryRecord> = ids
            .iter()
            .filter_map(|id| self.folders.get(id).cloned())
            .collect();
        let (folders, next_page_token) = self.page(&records, page_token);
        async move {
            Ok(FolderPage {
                folders,
                next_page_token,
            })
        }
    }

    fn fetch_edge_file(
        &self,
        folder_id: &str,
        edge: Edge,
    ) -> impl Future<Output = Result<Option<FileRecord>, DriveError>> + Send {
        let result = match self.files.get(folder_id) {
            Some(files) => Ok(match edge {
                Edge::Begin => files.first().cloned(),
                Edge::End => files.last().cloned(),
            }),
            None => Err(DriveError::NotFound(folder_id.to_string())),
        };
        async move { result }
    }
}
