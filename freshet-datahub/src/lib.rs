//! freshet-datahub
//!
//! Production implementation of the freshet service traits over the hub's
//! REST API: signup CRUD and update retrieval on the change broker,
//! type/stream CRUD on the metadata service, and time-keyed writes on the
//! data service, all behind a client-credentials bearer token.
//!
//! The crate deliberately contains no protocol logic — lifecycle waits,
//! bookmark advancement, and teardown live in `freshet-core`/`freshet`;
//! this is the wire.
#![warn(missing_docs)]

mod auth;
mod data;
mod metadata;
mod signups;
/// URL construction, bearer attachment, and response checking.
pub mod transport;

use std::sync::Arc;

use freshet_core::FreshetError;
use freshet_types::HubConfig;
use transport::HubTransport;

/// REST client for one tenant/namespace of the hub.
///
/// Implements [`freshet_core::SignupService`],
/// [`freshet_core::MetadataService`], and [`freshet_core::DataService`];
/// hand clones of one instance to each slot of the orchestrator.
#[derive(Clone)]
pub struct HubClient {
    transport: Arc<HubTransport>,
}

impl HubClient {
    /// Build a client from connection settings. Fails on a malformed
    /// resource URL; no network traffic happens until the first call.
    ///
    /// # Errors
    ///
    /// Returns [`FreshetError::InvalidArg`] when the resource URL cannot be
    /// parsed.
    pub fn from_config(cfg: &HubConfig) -> Result<Self, FreshetError> {
        Ok(Self {
            transport: Arc::new(HubTransport::new(cfg)?),
        })
    }

    pub(crate) fn transport(&self) -> &HubTransport {
        &self.transport
    }
}
