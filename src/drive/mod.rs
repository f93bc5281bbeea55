/// Drive collaborator interface
///
/// The viewer never talks to a storage backend directly. Everything it needs
/// (file metadata, paged folder listings, sibling folders, folder edge files)
/// goes through the `DriveClient` trait:
/// - `local.rs` - filesystem-backed implementation
/// - `natural.rs` - natural ("name_natural") ordering used by listings

pub mod local;
pub mod natural;

#[cfg(test)]
pub(crate) mod memory;

use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::DriveError;
use crate::geometry::Size;

/// One image known to the drive
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Opaque unique identifier
    pub id: String,
    /// Display name (e.g. "IMG_0001.jpg")
    pub name: String,
    /// Identifier of the containing folder
    pub parent_id: String,
    /// Location of a small preview
    pub thumbnail_url: String,
    /// Location of the full-size image
    pub content_url: String,
    /// Intrinsic width in px, when the drive knows it
    pub natural_width: Option<u32>,
    /// Intrinsic height in px, when the drive knows it
    pub natural_height: Option<u32>,
}

impl FileRecord {
    /// Intrinsic size, if both dimensions are known and non-zero
    pub fn natural_size(&self) -> Option<Size> {
        match (self.natural_width, self.natural_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some(Size::new(w as f64, h as f64)),
            _ => None,
        }
    }
}

/// One folder known to the drive
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryRecord {
    pub id: String,
    pub name: String,
    /// Containing folder; `None` for a drive root
    pub parent_id: Option<String>,
}

/// One page of a folder's image listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilePage {
    pub files: Vec<FileRecord>,
    pub next_page_token: Option<String>,
}

/// One page of a folder's sub-folder listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderPage {
    pub folders: Vec<DirectoryRecord>,
    pub next_page_token: Option<String>,
}

/// Which end of a folder's ordered listing
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    Begin,
    End,
}

/// Asynchronous access to a drive
///
/// Listings must be returned in a stable natural-sort order; the viewer never
/// reorders them. All futures must be `Send` so they can run on the tokio
/// runtime that drives a `Session`.
pub trait DriveClient: Send + Sync + 'static {
    /// Metadata of a single file
    fn fetch_file(&self, id: &str) -> impl Future<Output = Result<FileRecord, DriveError>> + Send;

    /// One page of the images contained in `parent_id`
    fn list_files(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<FilePage, DriveError>> + Send;

    /// The folder record for `id` (used to find the grandparent)
    fn fetch_parent(&self, id: &str) -> impl Future<Output = Result<DirectoryRecord, DriveError>> + Send;

    /// One page of the folders contained in `grand_parent_id`
    fn list_sibling_folders(
        &self,
        grand_parent_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<FolderPage, DriveError>> + Send;

    /// First or last image of `folder_id`, or `None` for a folder without images
    fn fetch_edge_file(
        &self,
        folder_id: &str,
        edge: Edge,
    ) -> impl Future<Output = Result<Option<FileRecord>, DriveError>> + Send;
}
