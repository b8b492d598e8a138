//! freshet-types
//!
//! Wire types and configuration shared across the freshet ecosystem.
//!
//! - `signup`: subscription lifecycle objects (signups, resources, filters).
//! - `update`: bookmarks and the tagged change operations returned by the
//!   updates endpoint.
//! - `metadata`: type and stream definitions for the hub's metadata service.
//! - `config`: connection and polling configuration.
//!
//! Everything here is plain data: serde-derived, camelCase on the wire, no
//! I/O. The service traits that move these types live in `freshet-core`.
#![warn(missing_docs)]

/// Connection, backoff, and polling configuration.
pub mod config;
/// Type and stream definitions managed by the metadata service.
pub mod metadata;
/// Signup lifecycle objects and resource accessibility types.
pub mod signup;
/// Bookmarks and incremental update payloads.
pub mod update;

pub use config::{BackoffConfig, HubConfig, PollConfig};
pub use metadata::{StreamDef, TypeCode, TypeDef, TypeProperty};
pub use signup::{
    CreateSignupInput, ResourceChanges, ResourceFilter, ResourceType, Signup, SignupCollection,
    SignupResource, SignupResources, SignupState,
};
pub use update::{Bookmark, Change, RemovedEvent, RemovedWindow, StreamUpdate, UpdateBatch};
