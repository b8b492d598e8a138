//! Best-effort teardown of signups, streams, and types.

use tracing::info;

use crate::core::Freshet;
use freshet_core::{Cleanup, FreshetError};

impl Freshet {
    /// Start a teardown plan. Steps run in the order they are queued —
    /// signups before their streams, streams before their type — and a
    /// failed step never prevents the remaining steps from running.
    #[must_use]
    pub fn teardown(&self) -> Teardown<'_> {
        Teardown {
            freshet: self,
            steps: Vec::new(),
        }
    }
}

enum Step {
    Signup(String),
    Stream(String),
    Type(String),
}

/// An ordered best-effort deletion plan.
///
/// Built with [`Freshet::teardown`]; consumed by [`run`](Teardown::run),
/// which attempts every step and returns a single
/// [`FreshetError::Cleanup`] aggregating whatever failed. Already-gone
/// targets count as cleaned up.
pub struct Teardown<'a> {
    freshet: &'a Freshet,
    steps: Vec<Step>,
}

impl Teardown<'_> {
    /// Queue a signup deletion.
    #[must_use]
    pub fn signup(mut self, signup_id: &str) -> Self {
        self.steps.push(Step::Signup(signup_id.to_string()));
        self
    }

    /// Queue deletions for several signups.
    #[must_use]
    pub fn signups<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(ids.into_iter().map(|id| Step::Signup(id.into())));
        self
    }

    /// Queue a stream deletion.
    #[must_use]
    pub fn stream(mut self, stream_id: &str) -> Self {
        self.steps.push(Step::Stream(stream_id.to_string()));
        self
    }

    /// Queue deletions for several streams.
    #[must_use]
    pub fn streams<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.extend(ids.into_iter().map(|id| Step::Stream(id.into())));
        self
    }

    /// Queue a type deletion. Order it after the type's streams.
    #[must_use]
    pub fn r#type(mut self, type_id: &str) -> Self {
        self.steps.push(Step::Type(type_id.to_string()));
        self
    }

    /// Run every queued step.
    ///
    /// # Errors
    ///
    /// Returns [`FreshetError::Cleanup`] when at least one step failed;
    /// every step has been attempted by then.
    pub async fn run(self) -> Result<(), FreshetError> {
        info!(steps = self.steps.len(), "tearing down");
        let mut cleanup = Cleanup::new();
        for step in self.steps {
            match step {
                Step::Signup(id) => {
                    cleanup
                        .run(format!("delete signup {id}"), self.freshet.delete_signup(&id))
                        .await;
                }
                Step::Stream(id) => {
                    cleanup
                        .run(
                            format!("delete stream {id}"),
                            self.freshet.metadata.delete_stream(&id),
                        )
                        .await;
                }
                Step::Type(id) => {
                    cleanup
                        .run(
                            format!("delete type {id}"),
                            self.freshet.metadata.delete_type(&id),
                        )
                        .await;
                }
            }
        }
        cleanup.finish()
    }
}
