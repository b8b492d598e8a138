//! Configuration types shared by the transports and the orchestrator.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Connection settings for the hub, the shape of the walkthroughs'
/// `appsettings.json` (whose keys are PascalCase; both spellings are
/// accepted).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubConfig {
    /// Base URL of the hub, e.g. `https://example.datahub.invalid`.
    #[serde(alias = "Resource")]
    pub resource: String,
    /// API version segment, e.g. `v1`.
    #[serde(alias = "ApiVersion")]
    pub api_version: String,
    /// Tenant identifier.
    #[serde(alias = "TenantId")]
    pub tenant_id: String,
    /// Namespace identifier.
    #[serde(alias = "NamespaceId")]
    pub namespace_id: String,
    /// OAuth client id for the client-credentials grant.
    #[serde(alias = "ClientId")]
    pub client_id: String,
    /// OAuth client secret.
    #[serde(alias = "ClientSecret")]
    pub client_secret: String,
}

/// Exponential backoff schedule with jitter for bounded polling waits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// First delay.
    pub initial: Duration,
    /// Cap on any single delay.
    pub max: Duration,
    /// Multiplier applied after each attempt.
    pub factor: u32,
    /// Random jitter added to each delay, as a percentage of it. Jitter
    /// avoids synchronized re-poll storms when many clients share a signup
    /// window.
    pub jitter_percent: u32,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_millis(500),
            max: Duration::from_secs(10),
            factor: 2,
            jitter_percent: 20,
        }
    }
}

/// A backoff schedule plus an overall deadline; the unit of every bounded
/// wait in the client (activation, update polling, accessibility).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Delay schedule between attempts.
    pub backoff: BackoffConfig,
    /// Total time budget across all attempts.
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            backoff: BackoffConfig::default(),
            deadline: Duration::from_secs(60),
        }
    }
}

impl PollConfig {
    /// A schedule with the given overall deadline and default backoff.
    #[must_use]
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            backoff: BackoffConfig::default(),
            deadline,
        }
    }
}
