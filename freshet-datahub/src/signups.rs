//! `SignupService` over the change-broker endpoints.

use async_trait::async_trait;

use crate::transport::{bookmark_from_header, encode};
use crate::HubClient;
use freshet_core::service::{Page, SignupService};
use freshet_core::FreshetError;
use freshet_types::{
    Bookmark, CreateSignupInput, ResourceChanges, ResourceFilter, Signup, SignupCollection,
    SignupResource, SignupResources, UpdateBatch,
};

/// Header carrying the next-updates link on older API versions.
const GET_UPDATES: &str = "Get-Updates";

#[async_trait]
impl SignupService for HubClient {
    async fn create_signup(&self, input: &CreateSignupInput) -> Result<Signup, FreshetError> {
        self.transport().post("signups", input).await
    }

    async fn get_signup(&self, signup_id: &str) -> Result<Signup, FreshetError> {
        let path = format!("signups/{}", encode(signup_id));
        let (mut signup, headers): (Signup, _) = self.transport().get_with_headers(&path).await?;
        // One API version returns the bookmark in the body, the other as a
        // Get-Updates link header; fold the header into the field.
        if signup.bookmark.is_none()
            && let Some(value) = headers.get(GET_UPDATES).and_then(|v| v.to_str().ok())
            && let Some(token) = bookmark_from_header(value)
        {
            signup.bookmark = Some(Bookmark::new(token));
        }
        Ok(signup)
    }

    async fn list_signups(&self, page: Page) -> Result<Vec<Signup>, FreshetError> {
        let path = format!("signups?skip={}&count={}", page.skip, page.count);
        let collection: SignupCollection = self.transport().get(&path).await?;
        Ok(collection.signups)
    }

    async fn get_signup_resources(
        &self,
        signup_id: &str,
        page: Page,
        filter: ResourceFilter,
    ) -> Result<Vec<SignupResource>, FreshetError> {
        let path = format!(
            "signups/{}/resources?skip={}&count={}&resourceFilter={}",
            encode(signup_id),
            page.skip,
            page.count,
            filter
        );
        let resources: SignupResources = self.transport().get(&path).await?;
        Ok(resources.resources)
    }

    async fn update_signup_resources(
        &self,
        signup_id: &str,
        changes: &ResourceChanges,
    ) -> Result<(), FreshetError> {
        let path = format!("signups/{}/resources", encode(signup_id));
        self.transport().post_unit(&path, changes).await
    }

    async fn get_updates(
        &self,
        signup_id: &str,
        bookmark: &Bookmark,
    ) -> Result<UpdateBatch, FreshetError> {
        let path = format!(
            "signups/{}/updates?bookmark={}",
            encode(signup_id),
            encode(bookmark.as_str())
        );
        self.transport().get(&path).await
    }

    async fn delete_signup(&self, signup_id: &str) -> Result<(), FreshetError> {
        let path = format!("signups/{}", encode(signup_id));
        self.transport().delete(&path).await
    }
}
