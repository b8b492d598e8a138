use tracing::warn;

use crate::FreshetError;

/// Best-effort teardown: run every step, collect failures, surface them at
/// the end.
///
/// The protocol's cleanup contract is that one failed deletion must not
/// prevent the remaining deletions from being attempted. This accumulator
/// makes that explicit: [`run`](Self::run) never short-circuits, and
/// [`finish`](Self::finish) returns `Ok` only if every step succeeded,
/// otherwise a single [`FreshetError::Cleanup`] carrying all failures in
/// execution order.
///
/// A step that fails with a not-found error is treated as already done —
/// deletion is idempotent from the caller's perspective.
#[derive(Debug, Default)]
pub struct Cleanup {
    failures: Vec<(String, FreshetError)>,
}

impl Cleanup {
    /// Start an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one teardown step. On failure the error is logged and recorded;
    /// the accumulator stays usable for the next step.
    pub async fn run<F>(&mut self, label: impl Into<String>, step: F)
    where
        F: Future<Output = Result<(), FreshetError>>,
    {
        let label = label.into();
        match step.await {
            Ok(()) => {}
            Err(err) if err.is_not_found() => {
                warn!(step = %label, "target already gone, treating as cleaned up");
            }
            Err(err) => {
                warn!(step = %label, error = %err, "cleanup step failed, continuing");
                self.failures.push((label, err));
            }
        }
    }

    /// Number of failed steps so far.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Finish the sequence: `Ok` if everything succeeded, otherwise a
    /// `Cleanup` error aggregating every failure.
    ///
    /// # Errors
    ///
    /// Returns [`FreshetError::Cleanup`] when at least one step failed.
    pub fn finish(self) -> Result<(), FreshetError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(FreshetError::Cleanup {
                failures: self.failures,
            })
        }
    }
}
