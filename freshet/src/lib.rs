//! Freshet orchestrates a change subscription's full lifecycle against a
//! time-series data hub.
//!
//! Overview
//! - Registers the three hub services (`SignupService`, `MetadataService`,
//!   `DataService`) behind one facade, [`Freshet`].
//! - Drives the signup lifecycle: create, bounded-backoff activation wait,
//!   resource mutation, deletion.
//! - Hands out an [`UpdatePoller`] per active signup that owns the bookmark
//!   and guarantees it advances on every poll.
//! - Re-queries resource accessibility and waits out reconciliation grace
//!   periods with backoff.
//! - Tears everything down best-effort, running every step and aggregating
//!   failures instead of aborting on the first.
//!
//! Key behaviors and trade-offs
//! - Activation is backend-driven: `wait_until_active` re-fetches the
//!   signup under a `PollConfig` deadline rather than sleeping a fixed
//!   interval, and reports `ActivationTimeout` instead of spinning forever.
//! - The `(signup, bookmark)` pair is owned by a single `UpdatePoller`;
//!   the type is deliberately not `Clone`, which serializes pollers per
//!   signup at compile time.
//! - Empty update batches are not errors; `wait_for_updates` backs off and
//!   re-polls until data arrives or its deadline lapses.
//! - Teardown failures are collected, logged, and surfaced once at the end
//!   so one refused deletion cannot strand the remaining resources.
//!
//! Example
//! ```rust,ignore
//! use std::sync::Arc;
//! use freshet::{Freshet, Teardown};
//! use freshet_types::{CreateSignupInput, StreamDef, TypeDef};
//!
//! let hub = Arc::new(freshet_datahub::HubClient::from_config(&cfg)?);
//! let freshet = Freshet::builder().with_hub(hub).build()?;
//!
//! let ty = freshet.get_or_create_type(&TypeDef::timestamped_double("simple")).await?;
//! let stream = freshet.get_or_create_stream(&StreamDef::new("stream_0", &ty.id)).await?;
//!
//! let signup = freshet.create_signup("sample", vec![stream.id.clone()]).await?;
//! let mut poller = freshet.wait_until_active(&signup.id).await?;
//!
//! freshet.insert_values(&stream.id, &events).await?;
//! for update in freshet.wait_for_updates(&mut poller).await? {
//!     // match update.change exhaustively
//! }
//!
//! freshet.teardown().signup(&signup.id).stream(&stream.id).r#type(&ty.id).run().await?;
//! ```
//!
//! See `freshet/examples/` for runnable end-to-end walkthroughs.
#![warn(missing_docs)]

pub(crate) mod core;
mod data;
mod lifecycle;
mod resources;
mod teardown;

pub use core::{Freshet, FreshetBuilder};
pub use teardown::Teardown;

// Re-export core types for convenience
pub use freshet_core::{
    Backoff,
    Cleanup,
    DataService,
    FreshetError,
    MetadataService,
    SignupService,
    UpdatePoller,
    service::Page,
};
pub use freshet_types::{
    BackoffConfig,
    Bookmark,
    Change,
    CreateSignupInput,
    HubConfig,
    PollConfig,
    RemovedEvent,
    RemovedWindow,
    ResourceChanges,
    ResourceFilter,
    ResourceType,
    Signup,
    SignupResource,
    SignupState,
    StreamDef,
    StreamUpdate,
    TypeCode,
    TypeDef,
    TypeProperty,
    UpdateBatch,
};
