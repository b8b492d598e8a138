//! Resource accessibility queries and reconciliation waits.

use std::collections::HashSet;

use tokio::time::Instant;
use tracing::debug;

use crate::core::Freshet;
use freshet_core::service::Page;
use freshet_core::{Backoff, FreshetError};
use freshet_types::{ResourceFilter, SignupResource};

impl Freshet {
    /// List a signup's resources with their current accessibility.
    ///
    /// Accessibility is recomputed server-side and can change independently
    /// of resource mutations; always re-query, never cache.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn resources(
        &self,
        signup_id: &str,
        page: Page,
        filter: ResourceFilter,
    ) -> Result<Vec<SignupResource>, FreshetError> {
        self.signups
            .get_signup_resources(signup_id, page, filter)
            .await
    }

    /// Poll under the accessibility budget until every resource in
    /// `resource_ids` reports accessible.
    ///
    /// Newly added resources legitimately show inaccessible for a grace
    /// period while the backend reconciles access; this wait absorbs that
    /// window. Returns the final resource listing on success.
    ///
    /// # Errors
    ///
    /// [`FreshetError::ActivationTimeout`] naming the still-inaccessible
    /// resources when the deadline lapses; otherwise propagates the
    /// service error.
    pub async fn wait_until_accessible(
        &self,
        signup_id: &str,
        resource_ids: &[String],
    ) -> Result<Vec<SignupResource>, FreshetError> {
        let started = Instant::now();
        let mut backoff = Backoff::new(&self.cfg.accessibility.backoff);
        let wanted: HashSet<&str> = resource_ids.iter().map(String::as_str).collect();
        loop {
            let resources = self
                .resources(signup_id, Page::default(), ResourceFilter::All)
                .await?;
            let pending: Vec<&str> = resources
                .iter()
                .filter(|r| wanted.contains(r.resource_id.as_str()) && !r.is_accessible)
                .map(|r| r.resource_id.as_str())
                .collect();
            let missing: Vec<&str> = wanted
                .iter()
                .copied()
                .filter(|id| !resources.iter().any(|r| r.resource_id == *id))
                .collect();
            if pending.is_empty() && missing.is_empty() {
                return Ok(resources);
            }
            debug!(signup_id, ?pending, ?missing, "resources not reconciled yet");

            let delay = backoff.next_delay();
            if started.elapsed() + delay > self.cfg.accessibility.deadline {
                let mut stragglers: Vec<&str> = pending;
                stragglers.extend(missing);
                return Err(FreshetError::timed_out(
                    format!(
                        "access reconciliation of [{}] on signup {signup_id}",
                        stragglers.join(", ")
                    ),
                    started.elapsed(),
                ));
            }
            tokio::time::sleep(delay).await;
        }
    }
}
