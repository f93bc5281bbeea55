//! Async driver for a viewing session
//!
//! `Session` pairs a [`Navigator`] with a [`DriveClient`]. It turns the
//! navigator's queued [`FetchRequest`]s into futures that run on tokio, and
//! feeds their results back. Every future races a `CancellationToken`, so
//! closing the session stops all outstanding work at once; anything that
//! still completes afterwards is rejected by the navigator's generation
//! check.

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::ViewerConfig;
use crate::drive::DriveClient;
use crate::error::{DriveError, StorageError};
use crate::nav::{Applied, FetchPayload, FetchRequest, FetchResult, Navigator};
use crate::storage::Storage;

/// Rate limit for refetching a listing after images fail to load
///
/// When signed content links expire, every image of the folder fails at
/// once; only the first failure inside the window triggers a refetch.
#[derive(Debug, Clone)]
pub struct ImageErrorCooldown {
    window: TimeDelta,
    last_refetch: Option<DateTime<Utc>>,
}

impl ImageErrorCooldown {
    pub fn new(window: TimeDelta) -> Self {
        Self {
            window,
            last_refetch: None,
        }
    }

    /// Record an image failure at `now`; true when a refetch should happen
    pub fn trigger(&mut self, now: DateTime<Utc>) -> bool {
        match self.last_refetch {
            Some(last) if now - last < self.window => false,
            _ => {
                self.last_refetch = Some(now);
                true
            }
        }
    }

    pub fn reset(&mut self) {
        self.last_refetch = None;
    }
}

pub struct Session<C: DriveClient> {
    client: Arc<C>,
    navigator: Navigator,
    token: CancellationToken,
    cooldown: ImageErrorCooldown,
}

impl<C: DriveClient> Session<C> {
    pub fn new(client: Arc<C>, navigator: Navigator, config: &ViewerConfig) -> Self {
        Self {
            client,
            navigator,
            token: CancellationToken::new(),
            cooldown: ImageErrorCooldown::new(TimeDelta::seconds(config.image_error_cooldown_secs)),
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut Navigator {
        &mut self.navigator
    }

    /// Futures for every request the navigator queued since the last call
    pub fn take_jobs(&mut self) -> Vec<impl Future<Output = Option<FetchResult>> + Send + 'static> {
        self.navigator
            .take_requests()
            .into_iter()
            .map(|request| self.request_future(request))
            .collect()
    }

    /// Run `request` against the drive
    ///
    /// Resolves to `None` when the session is closed first.
    pub fn request_future(
        &self,
        request: FetchRequest,
    ) -> impl Future<Output = Option<FetchResult>> + Send + 'static {
        let client = Arc::clone(&self.client);
        let token = self.token.clone();
        async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    log::debug!("Cancelled {}", request);
                    None
                }
                outcome = fetch(client.as_ref(), &request) => Some(FetchResult { request, outcome }),
            }
        }
    }

    /// Hand a finished request back to the navigator
    pub fn apply(&mut self, result: FetchResult) -> Applied {
        if matches!(&result.outcome, Err(err) if err.is_cancelled()) {
            log::debug!("Dropping cancelled response for {}", result.request);
            return Applied::Stale;
        }
        self.navigator.apply(result)
    }

    /// Run queued requests, and whatever they queue in turn, until the
    /// navigator has nothing left to ask for
    ///
    /// Returns the failures seen along the way.
    pub async fn settle(&mut self) -> Vec<DriveError> {
        let mut tasks = JoinSet::new();
        let mut failures = Vec::new();

        loop {
            for job in self.take_jobs() {
                tasks.spawn(job);
            }
            let Some(joined) = tasks.join_next().await else {
                break;
            };
            match joined {
                Ok(Some(result)) => {
                    if let Applied::Failed(err) = self.apply(result) {
                        failures.push(err);
                    }
                }
                Ok(None) => {}
                Err(err) => log::error!("Fetch task failed: {}", err),
            }
        }
        failures
    }

    /// The on-screen image failed to load (e.g. its link expired)
    ///
    /// Returns true when the listing is being refetched.
    pub fn on_image_error(&mut self, now: DateTime<Utc>) -> bool {
        if !self.navigator.is_open() {
            return false;
        }
        if self.cooldown.trigger(now) {
            self.navigator.invalidate_listing();
            true
        } else {
            log::debug!("Image error within cooldown, not refetching");
            false
        }
    }

    /// End the viewing session, cancelling every outstanding fetch
    pub fn close(&mut self) {
        self.token.cancel();
        self.token = CancellationToken::new();
        self.cooldown.reset();
        self.navigator.close();
    }

    /// Close and erase everything stored for the user
    pub fn sign_out(&mut self, storage: &Storage) -> Result<(), StorageError> {
        self.close();
        self.navigator.sign_out();
        storage.clear()?;
        self.navigator.recent_mut().persist(storage)?;
        log::info!("Signed out");
        Ok(())
    }

    /// Write the recent-files list if it changed
    pub fn persist_recent(&mut self, storage: &Storage) -> Result<bool, StorageError> {
        self.navigator.recent_mut().persist(storage)
    }
}

async fn fetch<C: DriveClient>(client: &C, request: &FetchRequest) -> Result<FetchPayload, DriveError> {
    match request {
        FetchRequest::File { id, .. } => client.fetch_file(id).await.map(FetchPayload::File),
        FetchRequest::Page {
            parent_id,
            page_token,
            ..
        } => client
            .list_files(parent_id, page_token.as_deref())
            .await
            .map(FetchPayload::Page),
        FetchRequest::Parent { folder_id, .. } => client
            .fetch_parent(folder_id)
            .await
            .map(FetchPayload::Parent),
        FetchRequest::SiblingFolders {
            grand_parent_id,
            page_token,
            ..
        } => client
            .list_sibling_folders(grand_parent_id, page_token.as_deref())
            .await
            .map(FetchPayload::SiblingFolders),
        FetchRequest::EdgeFile {
            folder_id, edge, ..
        } => client
            .fetch_edge_file(folder_id, *edge)
            .await
            .map(FetchPayload::EdgeFile),
    }
}
