use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque resumable cursor for incremental update retrieval.
///
/// Every updates response carries the bookmark to use for the next call.
/// Bookmarks are monotonic: passing an old one back re-delivers everything
/// after it, so a caller must always advance to the most recently returned
/// value. The string contents are server-defined and must not be inspected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bookmark(String);

impl Bookmark {
    /// Wrap a server-issued bookmark string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for embedding in a query string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Bookmark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Bookmark {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// A change operation observed on one resource.
///
/// Adjacently tagged on the wire: the `operation` field names the variant
/// and `events` carries its payload. The payload shape depends on the
/// operation, which is why this is a tagged union rather than a single
/// record with optional fields — consumption sites must handle every
/// operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", content = "events")]
pub enum Change {
    /// New events, in write order. Payload shape is stream-type specific.
    Insert(Vec<serde_json::Value>),
    /// In-place updates to existing events, full payloads.
    Update(Vec<serde_json::Value>),
    /// Replacements of existing events, full payloads.
    Replace(Vec<serde_json::Value>),
    /// Deletions; each element carries only the removed timestamp.
    Remove(Vec<RemovedEvent>),
    /// Window deletions; each element carries only the request bounds and
    /// does not say which events (if any) were deleted.
    RemoveWindow(Vec<RemovedWindow>),
}

impl Change {
    /// Number of elements in the operation's payload.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Insert(events) | Self::Update(events) | Self::Replace(events) => events.len(),
            Self::Remove(removed) => removed.len(),
            Self::RemoveWindow(windows) => windows.len(),
        }
    }

    /// `true` when the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Payload element of a [`Change::Remove`] operation.
///
/// Only the key timestamp survives a removal; the aliases cover the key
/// property names used by common stream types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedEvent {
    /// Timestamp of the removed event.
    #[serde(rename = "timestamp", alias = "Timestamp", alias = "Time", alias = "time")]
    pub timestamp: DateTime<Utc>,
}

/// Payload element of a [`Change::RemoveWindow`] operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemovedWindow {
    /// Inclusive start of the removed window.
    pub start: DateTime<Utc>,
    /// Inclusive end of the removed window.
    pub end: DateTime<Utc>,
}

/// One update record: a change operation on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUpdate {
    /// Identifier of the resource the change applies to.
    pub resource_id: String,
    /// The change itself.
    #[serde(flatten)]
    pub change: Change,
}

/// One response from the updates endpoint.
///
/// Ordering contract: records in `data` may arrive in any order across
/// resources, but events for a single resource preserve write order, within
/// a record and across successive batches. An empty `data` is a valid
/// outcome meaning "nothing new since the bookmark".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBatch {
    /// Cursor to pass to the next updates call.
    pub bookmark: Bookmark,
    /// The update records.
    pub data: Vec<StreamUpdate>,
}

impl UpdateBatch {
    /// `true` when the batch delivered no update records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
