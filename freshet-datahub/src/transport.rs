use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;
use url::Url;

use crate::auth::TokenSource;
use freshet_core::FreshetError;
use freshet_types::HubConfig;

/// Correlation header the hub attaches to every response; quoted in
/// [`FreshetError::Request`] for support requests.
const OPERATION_ID: &str = "Operation-Id";

/// Authenticated HTTP plumbing for one tenant/namespace.
///
/// Builds `/api/{version}/Tenants/{tenant}/Namespaces/{namespace}/...`
/// URLs, attaches the bearer token, and turns non-success responses into
/// [`FreshetError::Request`] values carrying the endpoint, status, and
/// correlation id.
pub struct HubTransport {
    http: reqwest::Client,
    base: Url,
    token: TokenSource,
}

impl HubTransport {
    /// Build the transport from connection settings.
    ///
    /// # Errors
    ///
    /// Returns [`FreshetError::InvalidArg`] on a malformed resource URL.
    pub fn new(cfg: &HubConfig) -> Result<Self, FreshetError> {
        let resource = Url::parse(&cfg.resource)
            .map_err(|e| FreshetError::InvalidArg(format!("bad resource url: {e}")))?;
        let base = resource
            .join(&format!(
                "api/{}/Tenants/{}/Namespaces/{}/",
                cfg.api_version, cfg.tenant_id, cfg.namespace_id
            ))
            .map_err(|e| FreshetError::InvalidArg(format!("bad hub path: {e}")))?;
        let token_endpoint = resource
            .join("identity/connect/token")
            .map_err(|e| FreshetError::InvalidArg(format!("bad identity path: {e}")))?;

        let http = reqwest::Client::new();
        let token = TokenSource::new(
            http.clone(),
            token_endpoint,
            cfg.client_id.clone(),
            cfg.client_secret.clone(),
        );
        Ok(Self { http, base, token })
    }

    fn endpoint(&self, method: &Method, path: &str) -> String {
        format!("{method} {path}")
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<(StatusCode, HeaderMap, Vec<u8>), FreshetError> {
        let endpoint = self.endpoint(&method, path);
        let url = self
            .base
            .join(path)
            .map_err(|e| FreshetError::InvalidArg(format!("bad path {path}: {e}")))?;
        let bearer = self.token.bearer().await?;

        let mut request = self.http.request(method, url).bearer_auth(bearer);
        if let Some(body) = body {
            request = request.json(body);
        }
        trace!(%endpoint, "sending");
        let response = request
            .send()
            .await
            .map_err(|e| FreshetError::transport(endpoint.clone(), e.to_string()))?;

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| FreshetError::transport(endpoint.clone(), e.to_string()))?;

        if status.is_success() {
            Ok((status, headers, bytes.to_vec()))
        } else {
            Err(FreshetError::request(
                endpoint,
                status.as_u16(),
                correlation_id(&headers),
            ))
        }
    }

    fn decode<T: DeserializeOwned>(endpoint: String, bytes: &[u8]) -> Result<T, FreshetError> {
        serde_json::from_slice(bytes)
            .map_err(|e| FreshetError::Data(format!("{endpoint}: malformed response body: {e}")))
    }

    /// GET returning a JSON body.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, FreshetError> {
        let (_, _, bytes) = self.send(Method::GET, path, None).await?;
        Self::decode(self.endpoint(&Method::GET, path), &bytes)
    }

    /// GET returning a JSON body plus the response headers, for endpoints
    /// that carry protocol data in headers.
    pub async fn get_with_headers<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<(T, HeaderMap), FreshetError> {
        let (_, headers, bytes) = self.send(Method::GET, path, None).await?;
        let body = Self::decode(self.endpoint(&Method::GET, path), &bytes)?;
        Ok((body, headers))
    }

    /// POST a JSON body, returning the JSON response.
    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, FreshetError> {
        let body = serde_json::to_value(body)
            .map_err(|e| FreshetError::Data(format!("unserializable body: {e}")))?;
        let (_, _, bytes) = self.send(Method::POST, path, Some(&body)).await?;
        Self::decode(self.endpoint(&Method::POST, path), &bytes)
    }

    /// POST a JSON body, ignoring the response body.
    pub async fn post_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), FreshetError> {
        let body = serde_json::to_value(body)
            .map_err(|e| FreshetError::Data(format!("unserializable body: {e}")))?;
        self.send(Method::POST, path, Some(&body)).await?;
        Ok(())
    }

    /// PUT a JSON body, ignoring the response body.
    pub async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> Result<(), FreshetError> {
        let body = serde_json::to_value(body)
            .map_err(|e| FreshetError::Data(format!("unserializable body: {e}")))?;
        self.send(Method::PUT, path, Some(&body)).await?;
        Ok(())
    }

    /// DELETE, ignoring the response body. A 404/410 surfaces as
    /// [`FreshetError::Request`] with that status; callers decide whether
    /// already-gone counts as success.
    pub async fn delete(&self, path: &str) -> Result<(), FreshetError> {
        self.send(Method::DELETE, path, None).await?;
        Ok(())
    }
}

/// Percent-encode one path or query component.
pub(crate) fn encode(component: &str) -> String {
    url::form_urlencoded::byte_serialize(component.as_bytes()).collect()
}

fn correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(OPERATION_ID)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

/// Extract a bookmark from a `Get-Updates` header value.
///
/// Older API versions return the next-updates link as a full URL in this
/// header instead of a bookmark body field; the bookmark is its `bookmark`
/// query parameter. A bare token value is accepted as-is.
pub fn bookmark_from_header(value: &str) -> Option<String> {
    match Url::parse(value) {
        Ok(url) => url
            .query_pairs()
            .find(|(k, _)| k == "bookmark")
            .map(|(_, v)| v.into_owned()),
        Err(_) if !value.is_empty() => Some(value.to_string()),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::bookmark_from_header;

    #[test]
    fn header_url_yields_its_bookmark_param() {
        let header =
            "https://hub.example.invalid/api/v1/Tenants/t/Namespaces/n/signups/sg-1/updates?bookmark=bm-42";
        assert_eq!(bookmark_from_header(header).as_deref(), Some("bm-42"));
    }

    #[test]
    fn bare_token_is_accepted() {
        assert_eq!(bookmark_from_header("bm-7").as_deref(), Some("bm-7"));
        assert_eq!(bookmark_from_header(""), None);
    }

    #[test]
    fn url_without_bookmark_param_yields_none() {
        assert_eq!(
            bookmark_from_header("https://hub.example.invalid/updates"),
            None
        );
    }
}
