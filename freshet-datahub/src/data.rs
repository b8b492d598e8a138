//! `DataService` over the stream data endpoints.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};

use crate::transport::encode;
use crate::HubClient;
use freshet_core::service::DataService;
use freshet_core::FreshetError;

fn index(ts: DateTime<Utc>) -> String {
    encode(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
}

#[async_trait]
impl DataService for HubClient {
    async fn insert_values(
        &self,
        stream_id: &str,
        events: &[serde_json::Value],
    ) -> Result<(), FreshetError> {
        let path = format!("Streams/{}/Data", encode(stream_id));
        self.transport().post_unit(&path, &events).await
    }

    async fn update_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError> {
        let path = format!("Streams/{}/Data", encode(stream_id));
        self.transport().put_unit(&path, &[event]).await
    }

    async fn replace_value(
        &self,
        stream_id: &str,
        event: &serde_json::Value,
    ) -> Result<(), FreshetError> {
        let path = format!("Streams/{}/Data?allowCreate=false", encode(stream_id));
        self.transport().put_unit(&path, &[event]).await
    }

    async fn remove_value(
        &self,
        stream_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        let path = format!("Streams/{}/Data?index={}", encode(stream_id), index(timestamp));
        self.transport().delete(&path).await
    }

    async fn remove_window_values(
        &self,
        stream_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        let path = format!(
            "Streams/{}/Data?startIndex={}&endIndex={}",
            encode(stream_id),
            index(start),
            index(end)
        );
        self.transport().delete(&path).await
    }
}
