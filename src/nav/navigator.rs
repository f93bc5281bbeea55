//! Cross-folder navigation state machine
//!
//! The navigator never awaits anything. Every operation that needs data from
//! the drive queues a [`FetchRequest`]; the owner drains them with
//! [`Navigator::take_requests`], runs them, and hands the outcome back through
//! [`Navigator::apply`]. Each request carries the generation of the state it
//! was issued for, so a response that arrives after the user moved on is
//! recognized and dropped instead of applied.

use std::fmt;

use crate::drive::{DirectoryRecord, Edge, FilePage, FileRecord, FolderPage};
use crate::error::DriveError;

use super::listing::FolderListing;
use super::recent::{RecentFile, RecentFiles};
use super::siblings::{EdgeCache, SiblingFolders};

/// Work the navigator needs done by a drive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    /// Metadata of the active file
    File { generation: u64, id: String },
    /// One page of the active folder's listing
    Page {
        generation: u64,
        parent_id: String,
        page_token: Option<String>,
    },
    /// Record of the active folder (name and grandparent)
    Parent { generation: u64, folder_id: String },
    /// One page of the grandparent's sub-folders
    SiblingFolders {
        generation: u64,
        grand_parent_id: String,
        page_token: Option<String>,
    },
    /// First or last image of a neighbouring folder
    EdgeFile {
        grand_parent_id: String,
        folder_id: String,
        edge: Edge,
    },
}

impl fmt::Display for FetchRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchRequest::File { id, .. } => write!(f, "file {}", id),
            FetchRequest::Page {
                parent_id,
                page_token,
                ..
            } => write!(
                f,
                "listing of {} (page {})",
                parent_id,
                page_token.as_deref().unwrap_or("first")
            ),
            FetchRequest::Parent { folder_id, .. } => write!(f, "folder {}", folder_id),
            FetchRequest::SiblingFolders {
                grand_parent_id, ..
            } => write!(f, "sub-folders of {}", grand_parent_id),
            FetchRequest::EdgeFile {
                folder_id, edge, ..
            } => write!(f, "{:?} image of {}", edge, folder_id),
        }
    }
}

/// Successful response to a [`FetchRequest`]
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPayload {
    File(FileRecord),
    Page(FilePage),
    Parent(DirectoryRecord),
    SiblingFolders(FolderPage),
    EdgeFile(Option<FileRecord>),
}

/// A finished request and what the drive answered
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub request: FetchRequest,
    pub outcome: Result<FetchPayload, DriveError>,
}

/// Result of a navigation operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Moved within the active folder
    Moved,
    /// Moved into a neighbouring folder
    Crossed,
    /// Waiting for more of the listing; the step runs once it arrives
    Deferred,
    /// Nothing to move to; state unchanged
    Unavailable,
}

/// What applying a [`FetchResult`] did
#[derive(Debug, Clone)]
pub enum Applied {
    Updated,
    /// The response belongs to a file or folder that is no longer active
    Stale,
    /// The fetch failed; the request is kept for [`Navigator::retry`]
    Failed(DriveError),
}

/// Which toolbar actions are currently possible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavFlags {
    pub first: bool,
    pub prev: bool,
    pub next: bool,
    pub last: bool,
    pub slideshow: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Prev,
    Next,
}

#[derive(Debug, Clone, Copy, Default)]
struct Generations {
    file: u64,
    listing: u64,
    folder: u64,
    siblings: u64,
}

/// Current file, its folder, and the way into neighbouring folders
#[derive(Debug)]
pub struct Navigator {
    file_id: Option<String>,
    parent_id: Option<String>,
    /// Metadata fetched for the active file on its own, so it can be shown
    /// before the listing reaches it
    direct_file: Option<FileRecord>,
    listing: Option<FolderListing>,
    directory: Option<DirectoryRecord>,
    siblings: Option<SiblingFolders>,
    prev_directory: Option<DirectoryRecord>,
    next_directory: Option<DirectoryRecord>,
    edges: EdgeCache,

    generations: Generations,
    page_in_flight: bool,
    deferred: Option<Step>,
    scroll_to_bottom: bool,

    recent: RecentFiles,
    just_opened: bool,
    last_recorded: Option<RecentFile>,

    pending: Vec<FetchRequest>,
    failed: Vec<FetchRequest>,
    last_error: Option<String>,
}

impl Navigator {
    pub fn new(recent: RecentFiles) -> Self {
        Self {
            file_id: None,
            parent_id: None,
            direct_file: None,
            listing: None,
            directory: None,
            siblings: None,
            prev_directory: None,
            next_directory: None,
            edges: EdgeCache::default(),
            generations: Generations::default(),
            page_in_flight: false,
            deferred: None,
            scroll_to_bottom: false,
            recent,
            just_opened: false,
            last_recorded: None,
            pending: Vec::new(),
            failed: Vec::new(),
            last_error: None,
        }
    }

    // ========== Queries ==========

    pub fn is_open(&self) -> bool {
        self.file_id.is_some()
    }

    pub fn file_id(&self) -> Option<&str> {
        self.file_id.as_deref()
    }

    pub fn parent_id(&self) -> Option<&str> {
        self.parent_id.as_deref()
    }

    pub fn listing(&self) -> Option<&FolderListing> {
        self.listing.as_ref()
    }

    /// Loaded part of the active folder
    pub fn files(&self) -> &[FileRecord] {
        self.listing.as_ref().map(|l| l.files()).unwrap_or(&[])
    }

    pub fn is_listing_finished(&self) -> bool {
        self.listing.as_ref().is_some_and(|l| l.is_finished())
    }

    pub fn directory(&self) -> Option<&DirectoryRecord> {
        self.directory.as_ref()
    }

    pub fn prev_directory(&self) -> Option<&DirectoryRecord> {
        self.prev_directory.as_ref()
    }

    pub fn next_directory(&self) -> Option<&DirectoryRecord> {
        self.next_directory.as_ref()
    }

    /// Last image of the previous folder, once resolved
    pub fn prev_edge_file(&self) -> Option<&FileRecord> {
        let folder = self.prev_directory.as_ref()?;
        self.edges.get(&folder.id, Edge::End).flatten()
    }

    /// First image of the next folder, once resolved
    pub fn next_edge_file(&self) -> Option<&FileRecord> {
        let folder = self.next_directory.as_ref()?;
        self.edges.get(&folder.id, Edge::Begin).flatten()
    }

    /// Position of the active file in the loaded listing
    pub fn active_index(&self) -> Option<usize> {
        let id = self.file_id.as_deref()?;
        self.listing.as_ref()?.index_of(id)
    }

    /// The active file, from the listing or from its own metadata fetch
    pub fn active_file(&self) -> Option<&FileRecord> {
        let id = self.file_id.as_deref()?;
        if let Some(file) = self
            .listing
            .as_ref()
            .and_then(|l| l.index_of(id).and_then(|i| l.get(i)))
        {
            return Some(file);
        }
        self.direct_file.as_ref().filter(|f| f.id == id)
    }

    /// "3/5", empty while the active file is not in the listing
    pub fn counter_text(&self) -> String {
        match self.active_index() {
            Some(index) => format!("{}/{}", index + 1, self.files().len()),
            None => String::new(),
        }
    }

    /// "{folder}/{file}", empty until both names are known
    pub fn title(&self) -> String {
        match (self.directory.as_ref(), self.active_file()) {
            (Some(dir), Some(file)) if !dir.name.is_empty() && !file.name.is_empty() => {
                format!("{}/{}", dir.name, file.name)
            }
            _ => String::new(),
        }
    }

    pub fn flags(&self) -> NavFlags {
        let Some(index) = self.active_index() else {
            return NavFlags::default();
        };
        let len = self.files().len();
        let next = index + 1 < len || self.next_edge_file().is_some();
        NavFlags {
            first: index > 0,
            prev: index > 0 || self.prev_edge_file().is_some(),
            next,
            last: index + 1 < len,
            slideshow: next,
        }
    }

    /// The new image should open scrolled to its end (moved backwards)
    pub fn scroll_to_bottom(&self) -> bool {
        self.scroll_to_bottom
    }

    /// Message of the most recent fetch failure, cleared by `retry`
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn has_failed_requests(&self) -> bool {
        !self.failed.is_empty()
    }

    pub fn recent(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn recent_mut(&mut self) -> &mut RecentFiles {
        &mut self.recent
    }

    /// Requests queued since the last call
    pub fn take_requests(&mut self) -> Vec<FetchRequest> {
        std::mem::take(&mut self.pending)
    }

    // ========== Operations ==========

    /// Open `file_id` explicitly (file dialog, recent list)
    pub fn open_file(&mut self, file_id: &str, parent_id: &str) {
        log::info!("Opening {} in {}", file_id, parent_id);

        if self.parent_id.as_deref() != Some(parent_id) || self.listing.is_none() {
            self.enter_folder(parent_id, None);
        }

        self.generations.file += 1;
        self.file_id = Some(file_id.to_string());
        self.direct_file = None;
        self.deferred = None;
        self.scroll_to_bottom = false;
        self.just_opened = true;
        self.pending.push(FetchRequest::File {
            generation: self.generations.file,
            id: file_id.to_string(),
        });
        self.record_recent();
    }

    /// Activate a file of the loaded listing (thumbnail click)
    pub fn select(&mut self, file_id: &str) -> NavOutcome {
        match self.listing.as_ref().and_then(|l| l.index_of(file_id)) {
            Some(index) => {
                self.move_to(index, false);
                NavOutcome::Moved
            }
            None => NavOutcome::Unavailable,
        }
    }

    pub fn next(&mut self) -> NavOutcome {
        self.step(Step::Next)
    }

    pub fn prev(&mut self) -> NavOutcome {
        self.step(Step::Prev)
    }

    /// First image of the active folder; never leaves the folder
    pub fn first(&mut self) -> NavOutcome {
        match self.active_index() {
            Some(index) if index > 0 => {
                self.move_to(0, false);
                NavOutcome::Moved
            }
            _ => NavOutcome::Unavailable,
        }
    }

    /// Last loaded image of the active folder; never leaves the folder
    pub fn last(&mut self) -> NavOutcome {
        let len = self.files().len();
        match self.active_index() {
            Some(index) if index + 1 < len => {
                self.move_to(len - 1, false);
                NavOutcome::Moved
            }
            _ => NavOutcome::Unavailable,
        }
    }

    /// Back to `Closed`; the recent list is kept
    pub fn close(&mut self) {
        self.generations.file += 1;
        self.generations.listing += 1;
        self.generations.folder += 1;
        self.generations.siblings += 1;
        self.file_id = None;
        self.parent_id = None;
        self.direct_file = None;
        self.listing = None;
        self.directory = None;
        self.siblings = None;
        self.prev_directory = None;
        self.next_directory = None;
        self.edges.clear();
        self.page_in_flight = false;
        self.deferred = None;
        self.scroll_to_bottom = false;
        self.just_opened = false;
        self.last_recorded = None;
        self.pending.clear();
        self.failed.clear();
        self.last_error = None;
    }

    /// Close and forget the recent list
    pub fn sign_out(&mut self) {
        self.close();
        self.recent.clear();
    }

    /// Re-issue every failed request that still matters
    pub fn retry(&mut self) {
        let failed = std::mem::take(&mut self.failed);
        for request in failed {
            if self.is_stale(&request) {
                continue;
            }
            match &request {
                FetchRequest::Page { .. } => self.page_in_flight = true,
                FetchRequest::EdgeFile {
                    folder_id, edge, ..
                } => self.edges.mark_in_flight(folder_id, *edge),
                _ => {}
            }
            log::debug!("Retrying {}", request);
            self.pending.push(request);
        }
        self.last_error = None;
    }

    /// Drop the active listing and fetch it again (e.g. expired image links)
    pub fn invalidate_listing(&mut self) {
        let Some(parent_id) = self.parent_id.clone() else {
            return;
        };
        log::info!("Refetching listing of {}", parent_id);

        self.generations.listing += 1;
        self.listing = Some(FolderListing::new(parent_id.clone()));
        self.failed
            .retain(|r| !matches!(r, FetchRequest::Page { .. } | FetchRequest::File { .. }));
        self.request_page(parent_id, None);

        if let Some(file_id) = self.file_id.clone() {
            self.generations.file += 1;
            self.direct_file = None;
            self.pending.push(FetchRequest::File {
                generation: self.generations.file,
                id: file_id,
            });
        }
    }

    /// Feed back the outcome of a request from `take_requests`
    pub fn apply(&mut self, result: FetchResult) -> Applied {
        let FetchResult { request, outcome } = result;

        if self.is_stale(&request) {
            log::debug!("Discarding stale response for {}", request);
            return Applied::Stale;
        }

        let payload = match outcome {
            Ok(payload) => payload,
            Err(err) => return self.fail(request, err),
        };

        match (request, payload) {
            (FetchRequest::File { .. }, FetchPayload::File(file)) => {
                self.direct_file = Some(file);
            }
            (FetchRequest::Page { parent_id, .. }, FetchPayload::Page(page)) => {
                self.apply_page(parent_id, page);
            }
            (FetchRequest::Parent { .. }, FetchPayload::Parent(directory)) => {
                self.apply_directory(directory);
            }
            (FetchRequest::SiblingFolders { .. }, FetchPayload::SiblingFolders(page)) => {
                self.apply_sibling_page(page);
            }
            (
                FetchRequest::EdgeFile {
                    folder_id, edge, ..
                },
                FetchPayload::EdgeFile(file),
            ) => {
                self.edges.insert(&folder_id, edge, file);
            }
            (request, payload) => {
                log::warn!("Mismatched response for {}: {:?}", request, payload);
                return Applied::Stale;
            }
        }

        self.record_recent();
        Applied::Updated
    }

    // ========== Internals ==========

    fn is_stale(&self, request: &FetchRequest) -> bool {
        match request {
            FetchRequest::File { generation, id } => {
                *generation != self.generations.file || self.file_id.as_deref() != Some(id.as_str())
            }
            FetchRequest::Page {
                generation,
                parent_id,
                ..
            } => {
                *generation != self.generations.listing
                    || self.parent_id.as_deref() != Some(parent_id.as_str())
            }
            FetchRequest::Parent {
                generation,
                folder_id,
            } => {
                *generation != self.generations.folder
                    || self.parent_id.as_deref() != Some(folder_id.as_str())
            }
            FetchRequest::SiblingFolders {
                generation,
                grand_parent_id,
                ..
            } => {
                *generation != self.generations.siblings
                    || self.siblings.as_ref().map(|s| s.grand_parent_id())
                        != Some(grand_parent_id.as_str())
            }
            FetchRequest::EdgeFile {
                grand_parent_id, ..
            } => self.edges.grand_parent_id() != Some(grand_parent_id.as_str()),
        }
    }

    fn fail(&mut self, request: FetchRequest, err: DriveError) -> Applied {
        match &request {
            FetchRequest::Page { .. } => self.page_in_flight = false,
            FetchRequest::EdgeFile {
                folder_id, edge, ..
            } => self.edges.mark_failed(folder_id, *edge),
            FetchRequest::File { id, .. } if matches!(err, DriveError::NotFound(_)) => {
                // Gone for good; a recent entry for it would never open again
                self.recent.remove(id);
            }
            _ => {}
        }
        log::warn!("Failed to fetch {}: {}", request, err);
        self.last_error = Some(err.to_string());
        self.failed.push(request);
        Applied::Failed(err)
    }

    /// Reset folder state for `parent_id`
    ///
    /// `known` is the folder's record when it is already known (crossing into
    /// a sibling); otherwise it is fetched.
    fn enter_folder(&mut self, parent_id: &str, known: Option<DirectoryRecord>) {
        self.generations.listing += 1;
        self.generations.folder += 1;
        self.parent_id = Some(parent_id.to_string());
        self.listing = Some(FolderListing::new(parent_id));
        self.page_in_flight = false;
        self.prev_directory = None;
        self.next_directory = None;
        self.failed.clear();
        self.request_page(parent_id.to_string(), None);

        match known {
            Some(directory) => {
                self.directory = Some(directory);
                self.resolve_neighbours();
            }
            None => {
                self.directory = None;
                self.pending.push(FetchRequest::Parent {
                    generation: self.generations.folder,
                    folder_id: parent_id.to_string(),
                });
            }
        }
    }

    fn request_page(&mut self, parent_id: String, page_token: Option<String>) {
        self.page_in_flight = true;
        self.pending.push(FetchRequest::Page {
            generation: self.generations.listing,
            parent_id,
            page_token,
        });
    }

    fn apply_page(&mut self, parent_id: String, page: FilePage) {
        self.page_in_flight = false;
        let Some(listing) = self.listing.as_mut() else {
            return;
        };
        listing.append_page(page);
        log::debug!(
            "Listing of {}: {} files{}",
            parent_id,
            listing.len(),
            if listing.is_finished() { "" } else { " so far" }
        );

        if let Some(token) = listing.next_page_token().map(str::to_string) {
            self.request_page(parent_id, Some(token));
        }

        if let Some(step) = self.deferred.take() {
            self.step(step);
        }
    }

    fn apply_directory(&mut self, directory: DirectoryRecord) {
        match directory.parent_id.clone() {
            Some(grand_parent_id) => {
                let reuse = self
                    .siblings
                    .as_ref()
                    .is_some_and(|s| s.grand_parent_id() == grand_parent_id);
                self.directory = Some(directory);
                if reuse {
                    self.resolve_neighbours();
                } else {
                    self.generations.siblings += 1;
                    self.siblings = Some(SiblingFolders::new(grand_parent_id.clone()));
                    self.edges.reset_for(&grand_parent_id);
                    self.pending.push(FetchRequest::SiblingFolders {
                        generation: self.generations.siblings,
                        grand_parent_id,
                        page_token: None,
                    });
                }
            }
            None => {
                // A drive root has no siblings to cross into
                self.directory = Some(directory);
                self.siblings = None;
                self.edges.clear();
            }
        }
    }

    fn apply_sibling_page(&mut self, page: FolderPage) {
        let Some(siblings) = self.siblings.as_mut() else {
            return;
        };
        siblings.append_page(page);
        if let Some(token) = siblings.next_page_token().map(str::to_string) {
            self.pending.push(FetchRequest::SiblingFolders {
                generation: self.generations.siblings,
                grand_parent_id: siblings.grand_parent_id().to_string(),
                page_token: Some(token),
            });
        }
        self.resolve_neighbours();
    }

    /// Find the folders around the active one and request their edge images
    fn resolve_neighbours(&mut self) {
        let (Some(siblings), Some(parent_id)) = (self.siblings.as_ref(), self.parent_id.as_deref())
        else {
            return;
        };
        let Some((prev, next)) = siblings.neighbours(parent_id) else {
            return;
        };
        self.prev_directory = prev.cloned();
        self.next_directory = next.cloned();

        let grand_parent_id = siblings.grand_parent_id().to_string();
        let wanted = [
            self.prev_directory.as_ref().map(|d| (d.id.clone(), Edge::End)),
            self.next_directory.as_ref().map(|d| (d.id.clone(), Edge::Begin)),
        ];
        for (folder_id, edge) in wanted.into_iter().flatten() {
            if self.edges.needs_fetch(&folder_id, edge) {
                self.edges.mark_in_flight(&folder_id, edge);
                self.pending.push(FetchRequest::EdgeFile {
                    grand_parent_id: grand_parent_id.clone(),
                    folder_id,
                    edge,
                });
            }
        }
    }

    fn move_to(&mut self, index: usize, scroll_to_bottom: bool) {
        let Some(file) = self.listing.as_ref().and_then(|l| l.get(index)) else {
            return;
        };
        if self.file_id.as_deref() != Some(file.id.as_str()) {
            self.generations.file += 1;
            self.file_id = Some(file.id.clone());
            self.direct_file = None;
        }
        self.scroll_to_bottom = scroll_to_bottom;
        self.deferred = None;
        self.record_recent();
    }

    fn step(&mut self, step: Step) -> NavOutcome {
        let Some(listing) = self.listing.as_ref() else {
            return NavOutcome::Unavailable;
        };
        let len = listing.len();
        let finished = listing.is_finished();

        let Some(index) = self.active_index() else {
            // Active file shown from its own metadata, not listed yet
            return if finished {
                NavOutcome::Unavailable
            } else {
                self.defer(step)
            };
        };

        match step {
            Step::Next if index + 1 < len => {
                self.move_to(index + 1, false);
                NavOutcome::Moved
            }
            Step::Next if !finished => self.defer(step),
            Step::Prev if index > 0 => {
                self.move_to(index - 1, true);
                NavOutcome::Moved
            }
            // Pages only append, so the start of the folder is already final
            _ => self.cross(step),
        }
    }

    fn defer(&mut self, step: Step) -> NavOutcome {
        self.deferred = Some(step);
        if !self.page_in_flight {
            let token = self
                .listing
                .as_ref()
                .and_then(|l| l.next_page_token())
                .map(str::to_string);
            let already_failed = self
                .failed
                .iter()
                .any(|r| matches!(r, FetchRequest::Page { .. }));
            if let (Some(parent_id), false) = (self.parent_id.clone(), already_failed) {
                self.request_page(parent_id, token);
            }
        }
        NavOutcome::Deferred
    }

    fn cross(&mut self, step: Step) -> NavOutcome {
        let (directory, file) = match step {
            Step::Next => (self.next_directory.clone(), self.next_edge_file().cloned()),
            Step::Prev => (self.prev_directory.clone(), self.prev_edge_file().cloned()),
        };
        let (Some(directory), Some(file)) = (directory, file) else {
            return NavOutcome::Unavailable;
        };

        log::info!("Crossing into folder {} at {}", directory.name, file.name);
        let folder_id = directory.id.clone();
        self.enter_folder(&folder_id, Some(directory));

        self.generations.file += 1;
        self.file_id = Some(file.id.clone());
        self.direct_file = Some(file);
        self.scroll_to_bottom = step == Step::Prev;
        self.deferred = None;
        self.record_recent();
        NavOutcome::Crossed
    }

    fn record_recent(&mut self) {
        let title = self.title();
        let (Some(file), Some(directory)) = (self.active_file(), self.directory.as_ref()) else {
            return;
        };
        if title.is_empty() {
            return;
        }
        let entry = RecentFile {
            id: file.id.clone(),
            parent_id: directory.id.clone(),
            title,
        };
        if self.last_recorded.as_ref() == Some(&entry) && !self.just_opened {
            return;
        }

        if self.just_opened {
            self.recent.shift(entry.clone());
            self.just_opened = false;
        } else {
            self.recent.replace(entry.clone());
        }
        self.last_recorded = Some(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::memory::image;

    fn folder(id: &str, parent: Option<&str>) -> DirectoryRecord {
        DirectoryRecord {
            id: id.to_string(),
            name: id.to_uppercase(),
            parent_id: parent.map(str::to_string),
        }
    }

    fn files(parent: &str, ids: &[&str]) -> Vec<FileRecord> {
        ids.iter().map(|id| image(id, parent)).collect()
    }

    fn ok(request: FetchRequest, payload: FetchPayload) -> FetchResult {
        FetchResult {
            request,
            outcome: Ok(payload),
        }
    }

    fn find(requests: &[FetchRequest], pred: impl Fn(&FetchRequest) -> bool) -> FetchRequest {
        requests
            .iter()
            .find(|r| pred(r))
            .cloned()
            .expect("request not queued")
    }

    fn is_page(r: &FetchRequest) -> bool {
        matches!(r, FetchRequest::Page { .. })
    }

    fn is_parent(r: &FetchRequest) -> bool {
        matches!(r, FetchRequest::Parent { .. })
    }

    fn is_file(r: &FetchRequest) -> bool {
        matches!(r, FetchRequest::File { .. })
    }

    fn navigator() -> Navigator {
        Navigator::new(RecentFiles::new(10))
    }

    /// Open `file` in folder `p` under `root` and answer every request;
    /// `p` has no siblings unless `siblings` lists more folders
    fn open_loaded(nav: &mut Navigator, ids: &[&str], file: &str, siblings: &[&str]) {
        nav.open_file(file, "p");
        let requests = nav.take_requests();
        nav.apply(ok(find(&requests, is_page), FetchPayload::Page(FilePage {
            files: files("p", ids),
            next_page_token: None,
        })));
        nav.apply(ok(find(&requests, is_file), FetchPayload::File(image(file, "p"))));
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("p", Some("root"))),
        ));

        let requests = nav.take_requests();
        let mut all: Vec<DirectoryRecord> = siblings.iter().map(|id| folder(id, Some("root"))).collect();
        if all.iter().all(|f| f.id != "p") {
            all.push(folder("p", Some("root")));
        }
        nav.apply(ok(
            find(&requests, |r| matches!(r, FetchRequest::SiblingFolders { .. })),
            FetchPayload::SiblingFolders(FolderPage {
                folders: all,
                next_page_token: None,
            }),
        ));
    }

    #[test]
    fn test_five_file_walk() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b", "c", "d", "e"], "c", &[]);
        assert!(nav.take_requests().is_empty());

        assert_eq!(nav.counter_text(), "3/5");
        assert_eq!(nav.title(), "P/c.jpg");

        assert_eq!(nav.next(), NavOutcome::Moved);
        assert_eq!(nav.file_id(), Some("d"));
        assert_eq!(nav.next(), NavOutcome::Moved);
        assert_eq!(nav.file_id(), Some("e"));
        assert_eq!(nav.next(), NavOutcome::Unavailable);
        assert_eq!(nav.file_id(), Some("e"));
        assert_eq!(nav.counter_text(), "5/5");
    }

    #[test]
    fn test_next_at_end_without_sibling_changes_nothing() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "b", &[]);
        nav.take_requests();

        let before = format!("{:?}", nav);
        assert_eq!(nav.next(), NavOutcome::Unavailable);
        assert_eq!(format!("{:?}", nav), before);
        assert!(nav.take_requests().is_empty());
    }

    #[test]
    fn test_next_defers_while_listing_unfinished() {
        let mut nav = navigator();
        nav.open_file("b", "p");
        let requests = nav.take_requests();
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("p", Some("root"))),
        ));
        let siblings = nav.take_requests();
        nav.apply(ok(
            find(&siblings, |r| matches!(r, FetchRequest::SiblingFolders { .. })),
            FetchPayload::SiblingFolders(FolderPage {
                folders: vec![folder("p", Some("root")), folder("q", Some("root"))],
                next_page_token: None,
            }),
        ));
        let edge = find(&nav.take_requests(), |r| matches!(r, FetchRequest::EdgeFile { .. }));
        nav.apply(ok(edge, FetchPayload::EdgeFile(Some(image("q1", "q")))));
        assert!(nav.next_edge_file().is_some());

        // First page ends at the active file; more pages to come
        nav.apply(ok(find(&requests, is_page), FetchPayload::Page(FilePage {
            files: files("p", &["a", "b"]),
            next_page_token: Some("2".into()),
        })));
        let second_page = find(&nav.take_requests(), is_page);

        assert_eq!(nav.next(), NavOutcome::Deferred);
        assert_eq!(nav.parent_id(), Some("p"));
        assert_eq!(nav.file_id(), Some("b"));
        // The page already in flight is not requested twice
        assert!(nav.take_requests().is_empty());

        nav.apply(ok(second_page, FetchPayload::Page(FilePage {
            files: files("p", &["c"]),
            next_page_token: None,
        })));
        // The deferred step ran when the page landed
        assert_eq!(nav.file_id(), Some("c"));
        assert_eq!(nav.parent_id(), Some("p"));
    }

    #[test]
    fn test_deferred_next_crosses_once_listing_finishes_empty() {
        let mut nav = navigator();
        nav.open_file("b", "p");
        let requests = nav.take_requests();
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("p", Some("root"))),
        ));
        let siblings = nav.take_requests();
        nav.apply(ok(
            siblings[0].clone(),
            FetchPayload::SiblingFolders(FolderPage {
                folders: vec![folder("p", Some("root")), folder("q", Some("root"))],
                next_page_token: None,
            }),
        ));
        let edge = find(&nav.take_requests(), |r| matches!(r, FetchRequest::EdgeFile { .. }));
        nav.apply(ok(edge, FetchPayload::EdgeFile(Some(image("q1", "q")))));

        nav.apply(ok(find(&requests, is_page), FetchPayload::Page(FilePage {
            files: files("p", &["a", "b"]),
            next_page_token: Some("2".into()),
        })));
        let second_page = find(&nav.take_requests(), is_page);
        assert_eq!(nav.next(), NavOutcome::Deferred);

        nav.apply(ok(second_page, FetchPayload::Page(FilePage::default())));
        assert_eq!(nav.parent_id(), Some("q"));
        assert_eq!(nav.file_id(), Some("q1"));
    }

    #[test]
    fn test_crossing_into_next_and_previous_folder() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "b", &["o", "p", "q"]);

        let edges = nav.take_requests();
        assert_eq!(edges.len(), 2);
        for request in edges {
            let FetchRequest::EdgeFile { folder_id, edge, .. } = &request else {
                panic!("unexpected {:?}", request);
            };
            let file = match (folder_id.as_str(), edge) {
                ("o", Edge::End) => image("o9", "o"),
                ("q", Edge::Begin) => image("q1", "q"),
                other => panic!("unexpected edge {:?}", other),
            };
            nav.apply(ok(request.clone(), FetchPayload::EdgeFile(Some(file))));
        }
        assert!(nav.flags().next);

        assert_eq!(nav.next(), NavOutcome::Crossed);
        assert_eq!(nav.parent_id(), Some("q"));
        assert_eq!(nav.file_id(), Some("q1"));
        // Shown straight away from the edge record
        assert_eq!(nav.active_file().map(|f| f.id.as_str()), Some("q1"));
        assert_eq!(nav.title(), "Q/q1.jpg");
        assert!(!nav.scroll_to_bottom());

        // The sibling list is reused: prev is now "p", whose last image is requested
        let requests = nav.take_requests();
        assert!(requests.iter().any(is_page));
        assert!(!requests.iter().any(is_parent));
        let edge = find(&requests, |r| matches!(r, FetchRequest::EdgeFile { edge: Edge::End, .. }));
        nav.apply(ok(edge, FetchPayload::EdgeFile(Some(image("b", "p")))));

        nav.apply(ok(find(&requests, is_page), FetchPayload::Page(FilePage {
            files: files("q", &["q1", "q2"]),
            next_page_token: None,
        })));
        assert_eq!(nav.counter_text(), "1/2");

        assert_eq!(nav.prev(), NavOutcome::Crossed);
        assert_eq!(nav.parent_id(), Some("p"));
        assert_eq!(nav.file_id(), Some("b"));
        assert!(nav.scroll_to_bottom());
    }

    #[test]
    fn test_new_grandparent_drops_edge_cache() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "b", &["o", "p", "q"]);
        let edges = nav.take_requests();
        let prev_edge = find(&edges, |r| matches!(r, FetchRequest::EdgeFile { edge: Edge::End, .. }));
        let next_edge = find(&edges, |r| matches!(r, FetchRequest::EdgeFile { edge: Edge::Begin, .. }));
        nav.apply(ok(prev_edge, FetchPayload::EdgeFile(Some(image("o9", "o")))));
        assert_eq!(nav.prev_edge_file().map(|f| f.id.as_str()), Some("o9"));

        // A folder under another grandparent
        nav.open_file("x1", "x");
        let requests = nav.take_requests();
        nav.apply(ok(find(&requests, is_file), FetchPayload::File(image("x1", "x"))));
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("x", Some("other"))),
        ));
        assert_eq!(nav.prev_edge_file(), None);

        // Late answer for the old grandparent
        assert!(matches!(
            nav.apply(ok(next_edge, FetchPayload::EdgeFile(Some(image("q1", "q"))))),
            Applied::Stale
        ));

        let siblings = find(&nav.take_requests(), |r| matches!(r, FetchRequest::SiblingFolders { .. }));
        assert!(matches!(
            &siblings,
            FetchRequest::SiblingFolders { grand_parent_id, .. } if grand_parent_id == "other"
        ));
        nav.apply(ok(siblings, FetchPayload::SiblingFolders(FolderPage {
            folders: vec![folder("w", Some("other")), folder("x", Some("other"))],
            next_page_token: None,
        })));
        let requests = nav.take_requests();
        assert_eq!(requests.len(), 1);
        assert!(matches!(
            &requests[0],
            FetchRequest::EdgeFile { grand_parent_id, folder_id, edge: Edge::End }
                if grand_parent_id == "other" && folder_id == "w"
        ));

        // Back under the first grandparent: nothing cached survives
        nav.open_file("b", "p");
        let requests = nav.take_requests();
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("p", Some("root"))),
        ));
        assert!(nav
            .take_requests()
            .iter()
            .any(|r| matches!(r, FetchRequest::SiblingFolders { grand_parent_id, .. } if grand_parent_id == "root")));
    }

    #[test]
    fn test_prev_crosses_at_index_zero_even_while_paging() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "a", &["o", "p"]);
        let edge = find(&nav.take_requests(), |r| matches!(r, FetchRequest::EdgeFile { .. }));
        nav.apply(ok(edge, FetchPayload::EdgeFile(Some(image("o9", "o")))));

        nav.invalidate_listing();
        let page = find(&nav.take_requests(), is_page);
        nav.apply(ok(page, FetchPayload::Page(FilePage {
            files: files("p", &["a"]),
            next_page_token: Some("1".into()),
        })));
        assert!(!nav.is_listing_finished());

        assert_eq!(nav.prev(), NavOutcome::Crossed);
        assert_eq!(nav.file_id(), Some("o9"));
    }

    #[test]
    fn test_stale_file_response_is_discarded() {
        let mut nav = navigator();
        nav.open_file("a", "p");
        let first = find(&nav.take_requests(), is_file);
        nav.open_file("b", "p");
        let second = find(&nav.take_requests(), is_file);

        assert!(matches!(
            nav.apply(ok(first, FetchPayload::File(image("a", "p")))),
            Applied::Stale
        ));
        assert_eq!(nav.file_id(), Some("b"));
        assert!(nav.active_file().is_none());

        assert!(matches!(
            nav.apply(ok(second, FetchPayload::File(image("b", "p")))),
            Applied::Updated
        ));
        assert_eq!(nav.active_file().map(|f| f.id.as_str()), Some("b"));
    }

    #[test]
    fn test_stale_listing_from_previous_folder() {
        let mut nav = navigator();
        nav.open_file("a", "p");
        let old_page = find(&nav.take_requests(), is_page);
        nav.open_file("x", "other");
        nav.take_requests();

        assert!(matches!(
            nav.apply(ok(old_page, FetchPayload::Page(FilePage {
                files: files("p", &["a"]),
                next_page_token: None,
            }))),
            Applied::Stale
        ));
        assert!(nav.files().is_empty());
    }

    #[test]
    fn test_active_file_renders_before_listing() {
        let mut nav = navigator();
        nav.open_file("c", "p");
        let requests = nav.take_requests();
        nav.apply(ok(find(&requests, is_file), FetchPayload::File(image("c", "p"))));
        nav.apply(ok(
            find(&requests, is_parent),
            FetchPayload::Parent(folder("p", None)),
        ));

        assert_eq!(nav.active_file().map(|f| f.id.as_str()), Some("c"));
        assert_eq!(nav.active_index(), None);
        assert_eq!(nav.counter_text(), "");
        assert_eq!(nav.title(), "P/c.jpg");
        assert_eq!(nav.flags(), NavFlags::default());
    }

    #[test]
    fn test_first_last_stay_in_folder() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b", "c"], "b", &[]);

        assert_eq!(nav.first(), NavOutcome::Moved);
        assert_eq!(nav.file_id(), Some("a"));
        assert_eq!(nav.first(), NavOutcome::Unavailable);
        assert_eq!(nav.prev(), NavOutcome::Unavailable);

        assert_eq!(nav.last(), NavOutcome::Moved);
        assert_eq!(nav.file_id(), Some("c"));
        assert_eq!(nav.last(), NavOutcome::Unavailable);
    }

    #[test]
    fn test_flags() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b", "c"], "a", &[]);
        assert_eq!(
            nav.flags(),
            NavFlags {
                first: false,
                prev: false,
                next: true,
                last: true,
                slideshow: true,
            }
        );
        nav.last();
        assert_eq!(
            nav.flags(),
            NavFlags {
                first: true,
                prev: true,
                next: false,
                last: false,
                slideshow: false,
            }
        );
    }

    #[test]
    fn test_failure_keeps_state_and_retry_reissues() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "b", &["p", "q"]);
        let edge = find(&nav.take_requests(), |r| matches!(r, FetchRequest::EdgeFile { .. }));

        let applied = nav.apply(FetchResult {
            request: edge.clone(),
            outcome: Err(DriveError::Network("offline".into())),
        });
        assert!(matches!(applied, Applied::Failed(DriveError::Network(_))));
        assert!(nav.last_error().is_some());
        assert_eq!(nav.file_id(), Some("b"));
        assert!(!nav.flags().next);
        assert_eq!(nav.next(), NavOutcome::Unavailable);

        nav.retry();
        assert!(nav.last_error().is_none());
        assert_eq!(nav.take_requests(), vec![edge.clone()]);
        nav.apply(ok(edge, FetchPayload::EdgeFile(Some(image("q1", "q")))));
        assert!(nav.flags().next);
    }

    #[test]
    fn test_missing_file_leaves_recent_list() {
        let mut recent = RecentFiles::new(10);
        for id in ["kept", "gone"] {
            recent.shift(RecentFile {
                id: id.to_string(),
                parent_id: "p".to_string(),
                title: format!("P/{}.jpg", id),
            });
        }
        let mut nav = Navigator::new(recent);

        nav.open_file("gone", "p");
        let file = find(&nav.take_requests(), is_file);
        let applied = nav.apply(FetchResult {
            request: file,
            outcome: Err(DriveError::NotFound("gone".into())),
        });
        assert!(matches!(applied, Applied::Failed(DriveError::NotFound(_))));
        let ids: Vec<_> = nav.recent().files().iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["kept"]);

        // A transient failure keeps the entry
        nav.open_file("kept", "p");
        let file = find(&nav.take_requests(), is_file);
        nav.apply(FetchResult {
            request: file,
            outcome: Err(DriveError::Network("offline".into())),
        });
        assert_eq!(nav.recent().files().len(), 1);
    }

    #[test]
    fn test_empty_next_folder_disables_crossing() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a"], "a", &["p", "q"]);
        let edge = find(&nav.take_requests(), |r| matches!(r, FetchRequest::EdgeFile { .. }));
        nav.apply(ok(edge, FetchPayload::EdgeFile(None)));
        assert!(!nav.flags().next);
        assert_eq!(nav.next(), NavOutcome::Unavailable);
    }

    #[test]
    fn test_recent_shift_on_open_replace_on_browse() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b", "c"], "a", &[]);
        assert_eq!(nav.recent().files().len(), 1);
        assert_eq!(nav.recent().files()[0].title, "P/a.jpg");

        nav.next();
        nav.next();
        assert_eq!(nav.recent().files().len(), 1);
        assert_eq!(nav.recent().files()[0].id, "c");

        nav.open_file("a", "p");
        assert_eq!(nav.recent().files().len(), 2);
        assert_eq!(nav.recent().files()[0].id, "a");
        assert_eq!(nav.recent().files()[1].id, "c");
    }

    #[test]
    fn test_close_and_sign_out() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "a", &[]);
        nav.close();
        assert!(!nav.is_open());
        assert!(nav.files().is_empty());
        assert_eq!(nav.next(), NavOutcome::Unavailable);
        assert_eq!(nav.recent().files().len(), 1);

        nav.sign_out();
        assert!(nav.recent().is_empty());
    }

    #[test]
    fn test_invalidate_listing_refetches() {
        let mut nav = navigator();
        open_loaded(&mut nav, &["a", "b"], "a", &[]);
        nav.invalidate_listing();
        let requests = nav.take_requests();
        assert!(requests.iter().any(is_page));
        assert!(requests.iter().any(is_file));
        assert!(nav.files().is_empty());
        // Still showing the same file from the recorded metadata once it arrives
        nav.apply(ok(find(&requests, is_file), FetchPayload::File(image("a", "p"))));
        assert_eq!(nav.active_file().map(|f| f.id.as_str()), Some("a"));
    }
}
