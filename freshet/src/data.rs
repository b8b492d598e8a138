//! Metadata passthroughs and typed data-write helpers.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::Freshet;
use freshet_core::FreshetError;
use freshet_types::{StreamDef, TypeDef};

fn to_value<T: Serialize>(event: &T) -> Result<serde_json::Value, FreshetError> {
    serde_json::to_value(event).map_err(|e| FreshetError::Data(format!("unserializable event: {e}")))
}

impl Freshet {
    /// Create the type, or fetch the identical existing one.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn get_or_create_type(&self, def: &TypeDef) -> Result<TypeDef, FreshetError> {
        self.metadata.get_or_create_type(def).await
    }

    /// Create the stream, or fetch the identical existing one.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn get_or_create_stream(&self, def: &StreamDef) -> Result<StreamDef, FreshetError> {
        self.metadata.get_or_create_stream(def).await
    }

    /// Insert typed events; the events' serialized shape must match the
    /// stream's type. Write order here is the order update batches later
    /// preserve per stream.
    ///
    /// # Errors
    ///
    /// `Data` if an event fails to serialize; otherwise the service error.
    pub async fn insert_values<T: Serialize>(
        &self,
        stream_id: &str,
        events: &[T],
    ) -> Result<(), FreshetError> {
        let events: Vec<serde_json::Value> =
            events.iter().map(to_value).collect::<Result<_, _>>()?;
        self.data.insert_values(stream_id, &events).await
    }

    /// Update (upsert) the event at the payload's key timestamp.
    ///
    /// # Errors
    ///
    /// `Data` if the event fails to serialize; otherwise the service error.
    pub async fn update_value<T: Serialize>(
        &self,
        stream_id: &str,
        event: &T,
    ) -> Result<(), FreshetError> {
        self.data.update_value(stream_id, &to_value(event)?).await
    }

    /// Replace the existing event at the payload's key timestamp.
    ///
    /// # Errors
    ///
    /// `Data` if the event fails to serialize; otherwise the service error.
    pub async fn replace_value<T: Serialize>(
        &self,
        stream_id: &str,
        event: &T,
    ) -> Result<(), FreshetError> {
        self.data.replace_value(stream_id, &to_value(event)?).await
    }

    /// Remove the event at `timestamp`.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn remove_value(
        &self,
        stream_id: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        self.data.remove_value(stream_id, timestamp).await
    }

    /// Remove every event in `[start, end]`. The resulting update record
    /// reports only the bounds.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn remove_window_values(
        &self,
        stream_id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), FreshetError> {
        self.data.remove_window_values(stream_id, start, end).await
    }
}
