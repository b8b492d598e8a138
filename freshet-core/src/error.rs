use std::time::Duration;

use thiserror::Error;

/// Unified error type for the freshet workspace.
///
/// This wraps authentication failures from the transport, non-success HTTP
/// responses, bounded-wait timeouts, terminal lifecycle states, and the
/// aggregate produced by best-effort teardown.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FreshetError {
    /// Credential or token error from the authenticating transport.
    #[error("authentication failed: {msg}")]
    Auth {
        /// Human-readable description from the identity endpoint.
        msg: String,
    },

    /// A hub endpoint returned a non-success status.
    #[error("request failed: {endpoint} returned {status}{}", correlation_suffix(.correlation_id))]
    Request {
        /// The endpoint that failed, e.g. `POST /signups`.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// `Operation-Id` correlation header, when present; quote it in
        /// support requests.
        correlation_id: Option<String>,
    },

    /// The request never produced an HTTP response, or the response body
    /// could not be read.
    #[error("transport error for {endpoint}: {msg}")]
    Transport {
        /// The endpoint being called.
        endpoint: String,
        /// Underlying I/O or protocol error.
        msg: String,
    },

    /// A bounded wait (activation, accessibility, update polling) lapsed.
    #[error("{what} did not complete within {waited:?}")]
    ActivationTimeout {
        /// What was being waited on, e.g. `activation of signup sg-1`.
        what: String,
        /// How long the wait ran before giving up.
        waited: Duration,
    },

    /// The signup reached a terminal state where an active one was required.
    #[error("signup {signup_id} is expired and cannot serve updates")]
    SignupExpired {
        /// The expired signup.
        signup_id: String,
    },

    /// A resource, signup, stream, or type could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing entity, e.g. `signup sg-1`.
        what: String,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with returned or expected data (missing bookmark, malformed
    /// payload, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Best-effort teardown finished, but one or more steps failed. Every
    /// step ran; the failures are collected here in execution order.
    #[error("cleanup finished with {} failure(s); first: {}", .failures.len(), first_failure(.failures))]
    Cleanup {
        /// `(step label, error)` for each failed step.
        failures: Vec<(String, FreshetError)>,
    },
}

fn correlation_suffix(correlation_id: &Option<String>) -> String {
    correlation_id
        .as_deref()
        .map_or_else(String::new, |id| format!(" (operation id {id})"))
}

fn first_failure(failures: &[(String, FreshetError)]) -> String {
    failures
        .first()
        .map_or_else(|| "<none>".to_string(), |(label, err)| format!("{label}: {err}"))
}

impl FreshetError {
    /// Helper: build an `Auth` error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth { msg: msg.into() }
    }

    /// Helper: build a `Request` error from an endpoint, status, and
    /// optional correlation id.
    pub fn request(endpoint: impl Into<String>, status: u16, correlation_id: Option<String>) -> Self {
        Self::Request {
            endpoint: endpoint.into(),
            status,
            correlation_id,
        }
    }

    /// Helper: build a `Transport` error.
    pub fn transport(endpoint: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Transport {
            endpoint: endpoint.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing
    /// entity.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build an `ActivationTimeout` error.
    pub fn timed_out(what: impl Into<String>, waited: Duration) -> Self {
        Self::ActivationTimeout {
            what: what.into(),
            waited,
        }
    }

    /// Helper: build a `SignupExpired` error.
    pub fn expired(signup_id: impl Into<String>) -> Self {
        Self::SignupExpired {
            signup_id: signup_id.into(),
        }
    }

    /// `true` for errors that indicate the target was already gone, which
    /// teardown treats as success.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Request { status: 404 | 410, .. })
    }
}
