/// Navigation through a folder and across folder boundaries
///
/// - `listing.rs` - paged image listing of the active folder
/// - `siblings.rs` - neighbouring folders and their boundary images
/// - `navigator.rs` - the state machine (open, prev/next, first/last, stale discard)
/// - `recent.rs` - bounded recent-files list and its persistence

pub mod listing;
pub mod navigator;
pub mod recent;
pub mod siblings;

pub use listing::FolderListing;
pub use navigator::{
    Applied, FetchPayload, FetchRequest, FetchResult, NavFlags, NavOutcome, Navigator,
};
pub use recent::{RecentFile, RecentFiles, RECENT_KEY};
pub use siblings::{EdgeCache, SiblingFolders};
