//! freshet-core
//!
//! Core contracts and protocol logic shared across the freshet ecosystem.
//!
//! - `error`: the unified [`FreshetError`] taxonomy.
//! - `service`: the three collaborator traits (`SignupService`,
//!   `MetadataService`, `DataService`) behind which the remote hub sits.
//! - `backoff`: bounded exponential delay schedules with jitter.
//! - `poller`: the bookmarked update-polling protocol, [`UpdatePoller`].
//! - `cleanup`: the run-all-collect-failures teardown combinator.
//!
//! Async runtime (Tokio)
//! ---------------------
//! This crate assumes the Tokio ecosystem: waits are implemented with
//! `tokio::time::sleep`, so polling helpers must run under a Tokio 1.x
//! runtime. Cancellation follows the usual async contract — every
//! suspension point is an await, so dropping a wait's future aborts it.
#![warn(missing_docs)]

/// Bounded exponential backoff schedules.
pub mod backoff;
/// Best-effort teardown with failure accumulation.
pub mod cleanup;
/// Unified error type.
pub mod error;
/// The bookmarked update-polling protocol.
pub mod poller;
/// Collaborator traits for the remote hub services.
pub mod service;

pub use backoff::Backoff;
pub use cleanup::Cleanup;
pub use error::FreshetError;
pub use poller::UpdatePoller;
pub use service::{DataService, MetadataService, SignupService};
