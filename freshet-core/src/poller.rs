use tokio::time::Instant;
use tracing::{debug, trace};

use crate::backoff::Backoff;
use crate::service::SignupService;
use crate::FreshetError;
use freshet_types::{Bookmark, PollConfig, StreamUpdate, UpdateBatch};

/// Incremental update retrieval for one active signup.
///
/// The poller owns the `(signup id, bookmark)` pair. Ownership is the
/// serialization mechanism the protocol requires: two pollers against the
/// same signup would race on bookmark advancement, so this type is not
/// `Clone` and its methods take `&mut self` — one poller per signup, one
/// caller per poller.
///
/// The bookmark is advanced to the server-returned value before updates are
/// handed to the caller, on every call including empty ones. A bookmark is
/// therefore never passed to the server twice through this type, which is
/// what makes delivery exactly-once at the update-metadata layer.
#[derive(Debug)]
pub struct UpdatePoller {
    signup_id: String,
    bookmark: Bookmark,
}

impl UpdatePoller {
    /// Start polling `signup_id` from `bookmark` (normally the one returned
    /// by activation).
    pub fn new(signup_id: impl Into<String>, bookmark: Bookmark) -> Self {
        Self {
            signup_id: signup_id.into(),
            bookmark,
        }
    }

    /// The signup this poller reads from.
    #[must_use]
    pub fn signup_id(&self) -> &str {
        &self.signup_id
    }

    /// The cursor the next poll will use.
    #[must_use]
    pub fn bookmark(&self) -> &Bookmark {
        &self.bookmark
    }

    /// Fetch updates written since the current bookmark and advance it.
    ///
    /// An empty vec is a valid outcome: nothing new since the bookmark,
    /// indistinguishable from "written but not yet processed". Callers that
    /// need to wait for data should use [`wait_for_updates`](Self::wait_for_updates)
    /// rather than re-polling in a tight loop.
    ///
    /// # Errors
    ///
    /// Propagates the service error; the bookmark is NOT advanced on error,
    /// so the failed call can be retried without losing updates.
    pub async fn poll_once(
        &mut self,
        service: &dyn SignupService,
    ) -> Result<Vec<StreamUpdate>, FreshetError> {
        let UpdateBatch { bookmark, data } =
            service.get_updates(&self.signup_id, &self.bookmark).await?;
        trace!(
            signup_id = %self.signup_id,
            records = data.len(),
            "advancing bookmark"
        );
        self.bookmark = bookmark;
        Ok(data)
    }

    /// Poll with backoff until at least one update record arrives or the
    /// deadline lapses.
    ///
    /// Returns the (possibly empty) last batch on deadline — an empty
    /// result is not an error, it means nothing was written. Dropping the
    /// future cancels the wait between polls.
    ///
    /// # Errors
    ///
    /// Propagates the first service error.
    pub async fn wait_for_updates(
        &mut self,
        service: &dyn SignupService,
        cfg: &PollConfig,
    ) -> Result<Vec<StreamUpdate>, FreshetError> {
        let started = Instant::now();
        let mut backoff = Backoff::new(&cfg.backoff);
        loop {
            let updates = self.poll_once(service).await?;
            if !updates.is_empty() {
                return Ok(updates);
            }
            let delay = backoff.next_delay();
            if started.elapsed() + delay > cfg.deadline {
                debug!(
                    signup_id = %self.signup_id,
                    waited = ?started.elapsed(),
                    "no updates before deadline"
                );
                return Ok(Vec::new());
            }
            tokio::time::sleep(delay).await;
        }
    }
}
