//! Client-credentials token source.

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use freshet_core::FreshetError;

/// Refresh this far ahead of expiry so in-flight requests never carry a
/// token that lapses mid-call.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + EXPIRY_MARGIN < self.expires_at
    }
}

/// Exchanges client credentials for bearer tokens at the hub's identity
/// endpoint, caching the token until shortly before expiry. Refresh is
/// lazy, on the request path; the client is a single logical thread of
/// control and needs no background refresh task.
pub(crate) struct TokenSource {
    http: reqwest::Client,
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(
        http: reqwest::Client,
        token_endpoint: Url,
        client_id: String,
        client_secret: String,
    ) -> Self {
        Self {
            http,
            token_endpoint,
            client_id,
            client_secret,
            cached: RwLock::new(None),
        }
    }

    /// The current bearer token, fetching or refreshing as needed.
    pub async fn bearer(&self) -> Result<String, FreshetError> {
        if let Some(token) = self.cached.read().await.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }

        let mut slot = self.cached.write().await;
        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = slot.as_ref()
            && token.is_fresh()
        {
            return Ok(token.access_token.clone());
        }

        let token = self.request_token().await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(access_token)
    }

    async fn request_token(&self) -> Result<CachedToken, FreshetError> {
        debug!(endpoint = %self.token_endpoint, "requesting access token");
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        let response = self
            .http
            .post(self.token_endpoint.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| FreshetError::auth(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FreshetError::auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| FreshetError::auth(format!("malformed token response: {e}")))?;
        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(token.expires_in),
        })
    }
}
