use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::FreshetError;
use freshet_types::{
    Bookmark, CreateSignupInput, ResourceChanges, ResourceFilter, Signup, SignupResource,
    StreamDef, TypeDef, UpdateBatch,
};

/// Paging window for list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Number of items to skip.
    pub skip: u32,
    /// Maximum number of items to return.
    pub count: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, count: 100 }
    }
}

/// The signup/update endpoints of the hub's change broker.
///
/// Implementations are remote collaborators: every method is one blocking
/// HTTP round trip, and any non-success response surfaces as a
/// [`FreshetError::Request`] carrying the endpoint, status, and correlation
/// id.
#[async_trait]
pub trait SignupService: Send + Sync {
    /// Submit a subscription request. The returned signup is in a
    /// pre-active state; callers must not assume a bookmark is available
    /// yet.
    async fn create_signup(&self, input: &CreateSignupInput) -> Result<Signup, FreshetError>;

    /// Re-fetch a signup. Once the backend finishes provisioning, the state
    /// reads `Active` and the bookmark is populated.
    async fn get_signup(&self, signup_id: &str) -> Result<Signup, FreshetError>;

    /// List the caller's signups. Signups in any lifecycle state are
    /// included.
    async fn list_signups(&self, page: Page) -> Result<Vec<Signup>, FreshetError>;

    /// List a signup's subscribed resources with their current
    /// accessibility. Accessibility is recomputed server-side; do not cache
    /// it across long-running sessions.
    async fn get_signup_resources(
        &self,
        signup_id: &str,
        page: Page,
        filter: ResourceFilter,
    ) -> Result<Vec<SignupResource>, FreshetError>;

    /// Mutate a signup's resource set without changing its lifecycle state.
    /// Newly added resources start pending and may report inaccessible for
    /// a grace period.
    async fn update_signup_resources(
        &self,
        signup_id: &str,
        changes: &ResourceChanges,
    ) -> Result<(), FreshetError>;

    /// Fetch updates written after `bookmark`. The returned batch carries
    /// the bookmark for the next call; see [`crate::UpdatePoller`] for the
    /// advancement contract.
    async fn get_updates(
        &self,
        signup_id: &str,
        bookmark: &Bookmark,
    ) -> Result<UpdateBatch, FreshetError>;

    /// Delete a signup. Terminal; deleting an already-deleted signup
    /// returns [`FreshetError::NotFound`], which teardown treats as
    /// success.
    async fn delete_signup(&self, signup_id: &str) -> Result<(), FreshetError>;
}

/// Type and stream CRUD on the hub's metadata service.
#[async_trait]
pub trait MetadataService: Send + Sync {
    /// Create the type, or fetch it if an identical one already exists.
    async fn get_or_create_type(&self, def: &TypeDef) -> Result<TypeDef, FreshetError>;

    /// Create the stream, or fetch it if an identical one already exists.
    async fn get_or_create_stream(&self, def: &StreamDef) -> Result<StreamDef, FreshetError>;

    /// Delete a stream.
    async fn delete_stream(&self, stream_id: &str) -> Result<(), FreshetError>;

    /// Delete a type. Fails while streams of the type still exist.
    async fn delete_type(&self, type_id: &str) -> Result<(), FreshetError>;
}

/// Time-keyed event writes on the hub's data service.
///
/// Event payloads are opaque JSON objects matching the stream's type; typed
/// convenience wrappers live on the facade.
#[async_trait]
pub trait DataService: Send + Sync {
    /// Insert events. Per-stream write order is what the change broker
    /// later preserves in update batches.
    async fn insert_values(
        &self,
        stream_id: &str,
        events: &[serde_json::Value],
    ) -> Result<(), FreshetError>;

    /// Update the event at the payload's key timestamp, inserting if absent.
    async fn update_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError>;

    /// Replace the existing event at the payload's key timestamp.
    async fn replace_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError>;

    /// Remove the event at the given timestamp.
    async fn remove_value(
        &self,
        stream_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), FreshetError>;

    /// Remove every event in `[start, end]`. The resulting update record
    /// reports only the bounds, not which events were deleted.
    async fn remove_window_values(
        &self,
        stream_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), FreshetError>;
}
