//! freshet-mock
//!
//! Deterministic in-memory hub for CI-safe examples and protocol tests.
//! Implements all three collaborator traits (`SignupService`,
//! `MetadataService`, `DataService`) against a single process-local state:
//! a global change log indexed by bookmark offsets, signups whose
//! activation is poll-driven, and per-resource accessibility grace
//! counters.
//!
//! Timing that is backend-driven in production (provisioning, access
//! reconciliation) is modeled as "N polls", which keeps tests fast and
//! deterministic while still exercising the retry paths.
#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use freshet_core::service::{DataService, MetadataService, Page, SignupService};
use freshet_core::FreshetError;
use freshet_types::{
    Bookmark, CreateSignupInput, ResourceChanges, ResourceFilter, ResourceType, Signup,
    SignupResource, SignupState, StreamDef, TypeDef, UpdateBatch,
};

mod log;
use log::{bookmark_at, group_updates, offset_of, LogEntry, Op};

#[derive(Debug, Clone)]
struct ResourceEntry {
    id: String,
    /// Resource polls left before the backend "reconciles" access.
    grace_remaining: u32,
}

#[derive(Debug)]
struct SignupRecord {
    name: String,
    state: SignupState,
    /// `get_signup` calls left before `Activating` flips to `Active`.
    polls_remaining: u32,
    resources: Vec<ResourceEntry>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
    /// Log offset the signup's bookmark started at (activation time).
    start_offset: usize,
}

#[derive(Debug, Default)]
struct State {
    types: HashMap<String, TypeDef>,
    streams: HashMap<String, StreamDef>,
    signups: HashMap<String, SignupRecord>,
    log: Vec<LogEntry>,
    next_signup: u64,
    /// Deletes left before one injected failure fires.
    fail_delete_in: Option<u32>,
}

/// In-memory hub backend.
///
/// Cloning shares the underlying state, so one `MockHub` can be handed to a
/// signup service, a metadata service, and a data service slot at once.
#[derive(Clone)]
pub struct MockHub {
    inner: Arc<Mutex<State>>,
    activation_polls: u32,
    access_grace_polls: u32,
}

impl Default for MockHub {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHub {
    /// Hub with a small activation delay (2 polls) and accessibility grace
    /// (2 polls), enough to exercise every retry path.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delays(2, 2)
    }

    /// Hub with explicit poll-driven delays. Zero for both makes every
    /// transition synchronous.
    #[must_use]
    pub fn with_delays(activation_polls: u32, access_grace_polls: u32) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State::default())),
            activation_polls,
            access_grace_polls,
        }
    }

    /// Arrange for the next delete (signup, stream, or type) to fail with a
    /// server error. One-shot.
    pub fn fail_next_delete(&self) {
        self.fail_next_delete_after(0);
    }

    /// Arrange for the delete after `skip` successful ones to fail with a
    /// server error. One-shot.
    pub fn fail_next_delete_after(&self, skip: u32) {
        self.inner.lock().unwrap().fail_delete_in = Some(skip);
    }

    /// Force a signup into the terminal `Expired` state.
    ///
    /// # Panics
    ///
    /// Panics if the signup does not exist; this is a test hook.
    pub fn expire_signup(&self, signup_id: &str) {
        let mut state = self.inner.lock().unwrap();
        let record = state.signups.get_mut(signup_id).expect("unknown signup");
        record.state = SignupState::Expired;
        record.modified = Utc::now();
    }

    fn take_delete_failure(state: &mut State, endpoint: &str) -> Result<(), FreshetError> {
        match state.fail_delete_in {
            Some(0) => {
                state.fail_delete_in = None;
                Err(FreshetError::request(endpoint.to_string(), 500, Some("mock-op".into())))
            }
            Some(n) => {
                state.fail_delete_in = Some(n - 1);
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn signup_view(id: &str, record: &SignupRecord) -> Signup {
        Signup {
            id: id.to_string(),
            name: record.name.clone(),
            resource_type: ResourceType::Stream,
            signup_state: record.state,
            created_date: record.created,
            modified_date: record.modified,
            bookmark: (record.state == SignupState::Active)
                .then(|| bookmark_at(record.start_offset)),
        }
    }

    fn require_stream(state: &State, stream_id: &str) -> Result<(), FreshetError> {
        if state.streams.contains_key(stream_id) {
            Ok(())
        } else {
            Err(FreshetError::not_found(format!("stream {stream_id}")))
        }
    }
}

#[async_trait]
impl SignupService for MockHub {
    async fn create_signup(&self, input: &CreateSignupInput) -> Result<Signup, FreshetError> {
        if input.resource_ids.is_empty() {
            return Err(FreshetError::InvalidArg(
                "a signup needs at least one resource".into(),
            ));
        }
        let mut state = self.inner.lock().unwrap();
        let id = format!("sg-{}", state.next_signup);
        state.next_signup += 1;
        let now = Utc::now();
        let start_offset = state.log.len();
        let record = SignupRecord {
            name: input.name.clone(),
            state: SignupState::Activating,
            polls_remaining: self.activation_polls,
            resources: input
                .resource_ids
                .iter()
                .map(|rid| ResourceEntry {
                    id: rid.clone(),
                    // Initial resources are reconciled during provisioning.
                    grace_remaining: 0,
                })
                .collect(),
            created: now,
            modified: now,
            start_offset,
        };
        let view = Self::signup_view(&id, &record);
        state.signups.insert(id, record);
        Ok(view)
    }

    async fn get_signup(&self, signup_id: &str) -> Result<Signup, FreshetError> {
        let mut state = self.inner.lock().unwrap();
        let record = state
            .signups
            .get_mut(signup_id)
            .ok_or_else(|| FreshetError::not_found(format!("signup {signup_id}")))?;
        if record.state == SignupState::Activating {
            if record.polls_remaining == 0 {
                record.state = SignupState::Active;
                record.modified = Utc::now();
            } else {
                record.polls_remaining -= 1;
            }
        }
        Ok(Self::signup_view(signup_id, record))
    }

    async fn list_signups(&self, page: Page) -> Result<Vec<Signup>, FreshetError> {
        let state = self.inner.lock().unwrap();
        let mut ids: Vec<&String> = state.signups.keys().collect();
        ids.sort();
        Ok(ids
            .into_iter()
            .skip(page.skip as usize)
            .take(page.count as usize)
            .map(|id| Self::signup_view(id, &state.signups[id]))
            .collect())
    }

    async fn get_signup_resources(
        &self,
        signup_id: &str,
        page: Page,
        filter: ResourceFilter,
    ) -> Result<Vec<SignupResource>, FreshetError> {
        let mut state = self.inner.lock().unwrap();
        let State {
            signups, streams, ..
        } = &mut *state;
        let record = signups
            .get_mut(signup_id)
            .ok_or_else(|| FreshetError::not_found(format!("signup {signup_id}")))?;

        let mut out = Vec::new();
        for entry in &mut record.resources {
            if entry.grace_remaining > 0 {
                entry.grace_remaining -= 1;
            }
            let accessible = entry.grace_remaining == 0 && streams.contains_key(&entry.id);
            let keep = match filter {
                ResourceFilter::All => true,
                ResourceFilter::Accessible => accessible,
                ResourceFilter::Inaccessible => !accessible,
                _ => true,
            };
            if keep {
                out.push(SignupResource {
                    resource_id: entry.id.clone(),
                    is_accessible: accessible,
                });
            }
        }
        Ok(out
            .into_iter()
            .skip(page.skip as usize)
            .take(page.count as usize)
            .collect())
    }

    async fn update_signup_resources(
        &self,
        signup_id: &str,
        changes: &ResourceChanges,
    ) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        let grace = self.access_grace_polls;
        let record = state
            .signups
            .get_mut(signup_id)
            .ok_or_else(|| FreshetError::not_found(format!("signup {signup_id}")))?;
        record
            .resources
            .retain(|entry| !changes.resources_to_remove.contains(&entry.id));
        for rid in &changes.resources_to_add {
            if record.resources.iter().any(|entry| entry.id == *rid) {
                continue;
            }
            record.resources.push(ResourceEntry {
                id: rid.clone(),
                grace_remaining: grace,
            });
        }
        record.modified = Utc::now();
        Ok(())
    }

    async fn get_updates(
        &self,
        signup_id: &str,
        bookmark: &Bookmark,
    ) -> Result<UpdateBatch, FreshetError> {
        let state = self.inner.lock().unwrap();
        let record = state
            .signups
            .get(signup_id)
            .ok_or_else(|| FreshetError::not_found(format!("signup {signup_id}")))?;
        match record.state {
            SignupState::Active => {}
            SignupState::Expired => return Err(FreshetError::expired(signup_id)),
            SignupState::Created | SignupState::Activating => {
                return Err(FreshetError::request(
                    format!("GET /signups/{signup_id}/updates"),
                    409,
                    Some("mock-op".into()),
                ));
            }
        }
        let offset = offset_of(bookmark).ok_or_else(|| {
            FreshetError::InvalidArg(format!("unrecognized bookmark {bookmark}"))
        })?;
        if offset > state.log.len() {
            return Err(FreshetError::InvalidArg(format!(
                "bookmark {bookmark} is past the end of the log"
            )));
        }
        let subscribed: Vec<String> =
            record.resources.iter().map(|entry| entry.id.clone()).collect();
        let data = group_updates(&state.log[offset..], &subscribed);
        Ok(UpdateBatch {
            bookmark: bookmark_at(state.log.len()),
            data,
        })
    }

    async fn delete_signup(&self, signup_id: &str) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::take_delete_failure(&mut state, &format!("DELETE /signups/{signup_id}"))?;
        state
            .signups
            .remove(signup_id)
            .map(|_| ())
            .ok_or_else(|| FreshetError::not_found(format!("signup {signup_id}")))
    }
}

#[async_trait]
impl MetadataService for MockHub {
    async fn get_or_create_type(&self, def: &TypeDef) -> Result<TypeDef, FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Ok(state
            .types
            .entry(def.id.clone())
            .or_insert_with(|| def.clone())
            .clone())
    }

    async fn get_or_create_stream(&self, def: &StreamDef) -> Result<StreamDef, FreshetError> {
        let mut state = self.inner.lock().unwrap();
        if !state.types.contains_key(&def.type_id) {
            return Err(FreshetError::not_found(format!("type {}", def.type_id)));
        }
        Ok(state
            .streams
            .entry(def.id.clone())
            .or_insert_with(|| def.clone())
            .clone())
    }

    async fn delete_stream(&self, stream_id: &str) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::take_delete_failure(&mut state, &format!("DELETE /streams/{stream_id}"))?;
        state
            .streams
            .remove(stream_id)
            .map(|_| ())
            .ok_or_else(|| FreshetError::not_found(format!("stream {stream_id}")))
    }

    async fn delete_type(&self, type_id: &str) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::take_delete_failure(&mut state, &format!("DELETE /types/{type_id}"))?;
        if state.streams.values().any(|s| s.type_id == type_id) {
            return Err(FreshetError::InvalidArg(format!(
                "type {type_id} still has streams"
            )));
        }
        state
            .types
            .remove(type_id)
            .map(|_| ())
            .ok_or_else(|| FreshetError::not_found(format!("type {type_id}")))
    }
}

#[async_trait]
impl DataService for MockHub {
    async fn insert_values(
        &self,
        stream_id: &str,
        events: &[serde_json::Value],
    ) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::require_stream(&state, stream_id)?;
        state
            .log
            .push(LogEntry::events(stream_id, Op::Insert, events.to_vec()));
        Ok(())
    }

    async fn update_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::require_stream(&state, stream_id)?;
        state
            .log
            .push(LogEntry::events(stream_id, Op::Update, vec![event.clone()]));
        Ok(())
    }

    async fn replace_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::require_stream(&state, stream_id)?;
        state
            .log
            .push(LogEntry::events(stream_id, Op::Replace, vec![event.clone()]));
        Ok(())
    }

    async fn remove_value(
        &self,
        stream_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        let mut state = self.inner.lock().unwrap();
        Self::require_stream(&state, stream_id)?;
        state.log.push(LogEntry::removal(stream_id, timestamp));
        Ok(())
    }

    async fn remove_window_values(
        &self,
        stream_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        if end < start {
            return Err(FreshetError::InvalidArg(
                "window end precedes start".into(),
            ));
        }
        let mut state = self.inner.lock().unwrap();
        Self::require_stream(&state, stream_id)?;
        state.log.push(LogEntry::window(stream_id, start, end));
        Ok(())
    }
}
