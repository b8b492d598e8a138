//! `MetadataService` over the type/stream endpoints.

use async_trait::async_trait;

use crate::transport::encode;
use crate::HubClient;
use freshet_core::service::MetadataService;
use freshet_core::FreshetError;
use freshet_types::{StreamDef, TypeDef};

#[async_trait]
impl MetadataService for HubClient {
    async fn get_or_create_type(&self, def: &TypeDef) -> Result<TypeDef, FreshetError> {
        let path = format!("Types/{}", encode(&def.id));
        self.transport().post(&path, def).await
    }

    async fn get_or_create_stream(&self, def: &StreamDef) -> Result<StreamDef, FreshetError> {
        let path = format!("Streams/{}", encode(&def.id));
        self.transport().post(&path, def).await
    }

    async fn delete_stream(&self, stream_id: &str) -> Result<(), FreshetError> {
        let path = format!("Streams/{}", encode(stream_id));
        self.transport().delete(&path).await
    }

    async fn delete_type(&self, type_id: &str) -> Result<(), FreshetError> {
        let path = format!("Types/{}", encode(type_id));
        self.transport().delete(&path).await
    }
}
