//! Signup lifecycle: creation, activation wait, resource mutation, deletion.

use tokio::time::Instant;
use tracing::{debug, info};

use crate::core::Freshet;
use freshet_core::{Backoff, FreshetError, UpdatePoller};
use freshet_types::{
    CreateSignupInput, ResourceChanges, Signup, SignupState,
};

impl Freshet {
    /// Submit a stream subscription over `resource_ids`.
    ///
    /// The returned signup is pre-active; call
    /// [`wait_until_active`](Self::wait_until_active) before polling for
    /// updates.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn create_signup(
        &self,
        name: &str,
        resource_ids: Vec<String>,
    ) -> Result<Signup, FreshetError> {
        let input = CreateSignupInput::streams(name, resource_ids);
        let signup = self.signups.create_signup(&input).await?;
        info!(signup_id = %signup.id, state = ?signup.signup_state, "signup created");
        Ok(signup)
    }

    /// Re-fetch a signup.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn get_signup(&self, signup_id: &str) -> Result<Signup, FreshetError> {
        self.signups.get_signup(signup_id).await
    }

    /// Poll the signup under the activation budget until the backend
    /// reports it `Active`, then return an [`UpdatePoller`] seeded with its
    /// bookmark.
    ///
    /// The transition is backend-driven; this method retries with
    /// exponential backoff rather than a fixed sleep, and gives up at the
    /// configured deadline. Dropping the returned future cancels the wait.
    ///
    /// # Errors
    ///
    /// - [`FreshetError::SignupExpired`] if the signup reaches the terminal
    ///   state before activating.
    /// - [`FreshetError::ActivationTimeout`] when the deadline lapses.
    /// - [`FreshetError::Data`] if an active signup carries no bookmark.
    pub async fn wait_until_active(&self, signup_id: &str) -> Result<UpdatePoller, FreshetError> {
        let started = Instant::now();
        let mut backoff = Backoff::new(&self.cfg.activation.backoff);
        loop {
            let signup = self.signups.get_signup(signup_id).await?;
            match signup.signup_state {
                SignupState::Active => {
                    info!(signup_id, waited = ?started.elapsed(), "signup active");
                    let bookmark = signup.bookmark.ok_or_else(|| {
                        FreshetError::Data(format!(
                            "signup {signup_id} is active but returned no bookmark"
                        ))
                    })?;
                    return Ok(UpdatePoller::new(signup_id, bookmark));
                }
                SignupState::Expired => return Err(FreshetError::expired(signup_id)),
                SignupState::Created | SignupState::Activating => {
                    debug!(signup_id, state = ?signup.signup_state, "still provisioning");
                }
            }
            let delay = backoff.next_delay();
            if started.elapsed() + delay > self.cfg.activation.deadline {
                return Err(FreshetError::timed_out(
                    format!("activation of signup {signup_id}"),
                    started.elapsed(),
                ));
            }
            tokio::time::sleep(delay).await;
        }
    }

    /// Add resources to an existing signup. Lifecycle state is unchanged;
    /// the new resources may report inaccessible until the backend
    /// reconciles access (see
    /// [`wait_until_accessible`](Self::wait_until_accessible)).
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn add_resources(
        &self,
        signup_id: &str,
        resource_ids: Vec<String>,
    ) -> Result<(), FreshetError> {
        self.signups
            .update_signup_resources(signup_id, &ResourceChanges::add(resource_ids))
            .await
    }

    /// Remove resources from an existing signup.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn remove_resources(
        &self,
        signup_id: &str,
        resource_ids: Vec<String>,
    ) -> Result<(), FreshetError> {
        self.signups
            .update_signup_resources(signup_id, &ResourceChanges::remove(resource_ids))
            .await
    }

    /// List the caller's signups.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn list_signups(
        &self,
        page: freshet_core::service::Page,
    ) -> Result<Vec<Signup>, FreshetError> {
        self.signups.list_signups(page).await
    }

    /// Delete a signup. Terminal; a not-found answer means it was already
    /// gone.
    ///
    /// # Errors
    ///
    /// Propagates the service error.
    pub async fn delete_signup(&self, signup_id: &str) -> Result<(), FreshetError> {
        self.signups.delete_signup(signup_id).await
    }

    /// Fetch any updates written since the poller's bookmark, advancing it.
    ///
    /// # Errors
    ///
    /// Propagates the service error; the bookmark is kept on failure.
    pub async fn poll_updates(
        &self,
        poller: &mut UpdatePoller,
    ) -> Result<Vec<freshet_types::StreamUpdate>, FreshetError> {
        poller.poll_once(self.signups.as_ref()).await
    }

    /// Poll under the updates budget until data arrives or the deadline
    /// lapses (empty result, not an error).
    ///
    /// # Errors
    ///
    /// Propagates the first service error.
    pub async fn wait_for_updates(
        &self,
        poller: &mut UpdatePoller,
    ) -> Result<Vec<freshet_types::StreamUpdate>, FreshetError> {
        poller
            .wait_for_updates(self.signups.as_ref(), &self.cfg.updates)
            .await
    }
}
