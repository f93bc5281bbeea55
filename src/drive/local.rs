/// Filesystem-backed drive
///
/// Exposes a directory tree as a drive: folders are directories, files are
/// images recognised by extension. Ids are paths relative to the root with
/// `/` separators (the root itself is the empty id). All filesystem work runs
/// on tokio's blocking pool so listing a large folder never stalls the UI.

use std::ffi::OsStr;
use std::io;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

use super::natural::natural_cmp;
use super::{DirectoryRecord, DriveClient, Edge, FilePage, FileRecord, FolderPage};
use crate::error::DriveError;

/// Image extensions shown by the viewer (lowercase)
pub const IMAGE_EXTENSIONS: [&str; 9] = [
    "jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff", "avif",
];

/// A drive rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalDrive {
    root: PathBuf,
    page_size: usize,
}

impl LocalDrive {
    /// Create a drive rooted at `root`, listing at most `page_size` entries per page
    pub fn new(root: impl Into<PathBuf>, page_size: usize) -> Self {
        Self {
            root: root.into(),
            page_size: page_size.max(1),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drive id of a path below the root, `None` if the path is outside it
    pub fn id_for_path(&self, path: &Path) -> Option<String> {
        path_to_id(&self.root, path)
    }

    /// Build the record of a picked file (blocking; used by the native file dialog)
    pub fn record_for_path(&self, path: &Path) -> Result<FileRecord, DriveError> {
        let id = self
            .id_for_path(path)
            .ok_or_else(|| DriveError::NotFound(path.display().to_string()))?;
        file_record(&self.root, &id)
    }
}

/// Check if a path looks like a supported image
fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// `None` for paths outside the root and for names that are not valid UTF-8,
/// which could not be mapped back from their id
fn path_to_id(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Drop entries that disappeared between the directory scan and the record
/// read; any other failure still fails the request
fn skip_vanished<T>(record: Result<T, DriveError>) -> Option<Result<T, DriveError>> {
    match record {
        Err(DriveError::NotFound(id)) => {
            log::debug!("{} vanished while listing", id);
            None
        }
        other => Some(other),
    }
}

/// Map an id back to a path, refusing anything that escapes the root
fn resolve(root: &Path, id: &str) -> Result<PathBuf, DriveError> {
    let rel = Path::new(id);
    if rel
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Err(DriveError::NotFound(id.to_string()));
    }
    Ok(root.join(rel))
}

fn parent_id_of(id: &str) -> Option<String> {
    if id.is_empty() {
        return None;
    }
    Some(match id.rfind('/') {
        Some(i) => id[..i].to_string(),
        None => String::new(),
    })
}

fn file_record(root: &Path, id: &str) -> Result<FileRecord, DriveError> {
    let path = resolve(root, id)?;
    if !path.is_file() || !is_image_path(&path) {
        return Err(DriveError::NotFound(id.to_string()));
    }

    let name = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    // Header-only read; a corrupt file still lists, it just has no known size
    let dimensions = image::image_dimensions(&path).ok();
    if dimensions.is_none() {
        log::debug!("no readable dimensions for {}", path.display());
    }

    let url = path.to_string_lossy().to_string();
    Ok(FileRecord {
        id: id.to_string(),
        name,
        parent_id: parent_id_of(id).unwrap_or_default(),
        thumbnail_url: url.clone(),
        content_url: url,
        natural_width: dimensions.map(|(w, _)| w),
        natural_height: dimensions.map(|(_, h)| h),
    })
}

/// Direct children of `dir` in natural order, either images or folders
fn read_children(dir: &Path, folders: bool) -> Result<Vec<PathBuf>, DriveError> {
    if !dir.is_dir() {
        return Err(DriveError::NotFound(dir.display().to_string()));
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(io::Error::from)?;
        let path = entry.path();
        let keep = if folders {
            entry.file_type().is_dir()
        } else {
            entry.file_type().is_file() && is_image_path(path)
        };
        if !keep {
            continue;
        }
        if path.file_name().and_then(OsStr::to_str).is_none() {
            log::warn!("Skipping {}: name is not valid UTF-8", path.display());
            continue;
        }
        children.push(path.to_path_buf());
    }

    children.sort_by(|a, b| {
        let a = a.file_name().and_then(OsStr::to_str).unwrap_or_default();
        let b = b.file_name().and_then(OsStr::to_str).unwrap_or_default();
        natural_cmp(a, b)
    });
    Ok(children)
}

/// Slice one page out of `items`; the page token is the offset of the next page
fn paginate<T>(items: Vec<T>, page_token: Option<&str>, page_size: usize) -> (Vec<T>, Option<String>) {
    let start = page_token
        .and_then(|t| t.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (start + page_size).min(items.len());
    let next = (end < items.len()).then(|| end.to_string());
    let page = items.into_iter().skip(start).take(end - start).collect();
    (page, next)
}

fn list_files_blocking(
    root: &Path,
    parent_id: &str,
    page_token: Option<&str>,
    page_size: usize,
) -> Result<FilePage, DriveError> {
    let dir = resolve(root, parent_id)?;
    let children = read_children(&dir, false)?;
    let (page, next_page_token) = paginate(children, page_token, page_size);

    let files = page
        .iter()
        .filter_map(|path| path_to_id(root, path))
        .filter_map(|id| skip_vanished(file_record(root, &id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FilePage {
        files,
        next_page_token,
    })
}

fn directory_record(root: &Path, id: &str) -> Result<DirectoryRecord, DriveError> {
    let path = resolve(root, id)?;
    if !path.is_dir() {
        return Err(DriveError::NotFound(id.to_string()));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "/".to_string());

    Ok(DirectoryRecord {
        id: id.to_string(),
        name,
        parent_id: parent_id_of(id),
    })
}

fn list_folders_blocking(
    root: &Path,
    grand_parent_id: &str,
    page_token: Option<&str>,
    page_size: usize,
) -> Result<FolderPage, DriveError> {
    let dir = resolve(root, grand_parent_id)?;
    let children = read_children(&dir, true)?;
    let (page, next_page_token) = paginate(children, page_token, page_size);

    let folders = page
        .iter()
        .filter_map(|path| path_to_id(root, path))
        .filter_map(|id| skip_vanished(directory_record(root, &id)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FolderPage {
        folders,
        next_page_token,
    })
}

fn edge_file_blocking(root: &Path, folder_id: &str, edge: Edge) -> Result<Option<FileRecord>, DriveError> {
    let dir = resolve(root, folder_id)?;
    let children = read_children(&dir, false)?;
    let ordered: Vec<&PathBuf> = match edge {
        Edge::Begin => children.iter().collect(),
        Edge::End => children.iter().rev().collect(),
    };
    ordered
        .into_iter()
        .filter_map(|path| path_to_id(root, path))
        .find_map(|id| skip_vanished(file_record(root, &id)))
        .transpose()
}

/// Run blocking filesystem work off the async executor
async fn blocking<T, F>(work: F) -> Result<T, DriveError>
where
    F: FnOnce() -> Result<T, DriveError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| DriveError::from(io::Error::new(io::ErrorKind::Other, e.to_string())))?
}

impl DriveClient for LocalDrive {
    fn fetch_file(&self, id: &str) -> impl std::future::Future<Output = Result<FileRecord, DriveError>> + Send {
        let root = self.root.clone();
        let id = id.to_string();
        async move { blocking(move || file_record(&root, &id)).await }
    }

    fn list_files(
        &self,
        parent_id: &str,
        page_token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FilePage, DriveError>> + Send {
        let root = self.root.clone();
        let parent_id = parent_id.to_string();
        let page_token = page_token.map(str::to_string);
        let page_size = self.page_size;
        async move {
            blocking(move || {
                list_files_blocking(&root, &parent_id, page_token.as_deref(), page_size)
            })
            .await
        }
    }

    fn fetch_parent(&self, id: &str) -> impl std::future::Future<Output = Result<DirectoryRecord, DriveError>> + Send {
        let root = self.root.clone();
        let id = id.to_string();
        async move { blocking(move || directory_record(&root, &id)).await }
    }

    fn list_sibling_folders(
        &self,
        grand_parent_id: &str,
        page_token: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FolderPage, DriveError>> + Send {
        let root = self.root.clone();
        let grand_parent_id = grand_parent_id.to_string();
        let page_token = page_token.map(str::to_string);
        let page_size = self.page_size;
        async move {
            blocking(move || {
                list_folders_blocking(&root, &grand_parent_id, page_token.as_deref(), page_size)
            })
            .await
        }
    }

    fn fetch_edge_file(
        &self,
        folder_id: &str,
        edge: Edge,
    ) -> impl std::future::Future<Output = Result<Option<FileRecord>, DriveError>> + Send {
        let root = self.root.clone();
        let folder_id = folder_id.to_string();
        async move { blocking(move || edge_file_blocking(&root, &folder_id, edge)).await }
    }
}
