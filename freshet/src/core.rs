use std::sync::Arc;

use freshet_core::{DataService, FreshetError, MetadataService, SignupService};
use freshet_types::PollConfig;

/// Polling budgets for the three bounded waits the facade performs.
#[derive(Debug, Clone, Default)]
pub(crate) struct FreshetConfig {
    pub activation: PollConfig,
    pub accessibility: PollConfig,
    pub updates: PollConfig,
}

/// Facade over the hub's signup, metadata, and data services.
pub struct Freshet {
    pub(crate) signups: Arc<dyn SignupService>,
    pub(crate) metadata: Arc<dyn MetadataService>,
    pub(crate) data: Arc<dyn DataService>,
    pub(crate) cfg: FreshetConfig,
}

impl std::fmt::Debug for Freshet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Freshet").finish_non_exhaustive()
    }
}

impl Freshet {
    /// Start building a facade.
    #[must_use]
    pub fn builder() -> FreshetBuilder {
        FreshetBuilder::new()
    }

    /// The registered signup service, for driving an
    /// [`freshet_core::UpdatePoller`] directly.
    #[must_use]
    pub fn signup_service(&self) -> &dyn SignupService {
        self.signups.as_ref()
    }
}

/// Builder for a [`Freshet`] facade.
///
/// Register either one backend for all three services via
/// [`with_hub`](Self::with_hub), or mix implementations per service. The
/// polling budgets default to one minute with exponential backoff from
/// 500 ms; shorten them in tests.
pub struct FreshetBuilder {
    signups: Option<Arc<dyn SignupService>>,
    metadata: Option<Arc<dyn MetadataService>>,
    data: Option<Arc<dyn DataService>>,
    cfg: FreshetConfig,
}

impl Default for FreshetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FreshetBuilder {
    /// Create a builder with no services registered and default budgets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            signups: None,
            metadata: None,
            data: None,
            cfg: FreshetConfig::default(),
        }
    }

    /// Register one backend in all three service slots.
    #[must_use]
    pub fn with_hub<T>(self, hub: Arc<T>) -> Self
    where
        T: SignupService + MetadataService + DataService + 'static,
    {
        self.signup_service(hub.clone())
            .metadata_service(hub.clone())
            .data_service(hub)
    }

    /// Register the signup/update service.
    #[must_use]
    pub fn signup_service(mut self, svc: Arc<dyn SignupService>) -> Self {
        self.signups = Some(svc);
        self
    }

    /// Register the metadata service.
    #[must_use]
    pub fn metadata_service(mut self, svc: Arc<dyn MetadataService>) -> Self {
        self.metadata = Some(svc);
        self
    }

    /// Register the data service.
    #[must_use]
    pub fn data_service(mut self, svc: Arc<dyn DataService>) -> Self {
        self.data = Some(svc);
        self
    }

    /// Budget for the activation wait (`wait_until_active`).
    #[must_use]
    pub fn activation_poll(mut self, cfg: PollConfig) -> Self {
        self.cfg.activation = cfg;
        self
    }

    /// Budget for the accessibility wait (`wait_until_accessible`).
    #[must_use]
    pub fn accessibility_poll(mut self, cfg: PollConfig) -> Self {
        self.cfg.accessibility = cfg;
        self
    }

    /// Budget for `wait_for_updates`.
    #[must_use]
    pub fn updates_poll(mut self, cfg: PollConfig) -> Self {
        self.cfg.updates = cfg;
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    ///
    /// Returns [`FreshetError::InvalidArg`] if any service slot is empty.
    pub fn build(self) -> Result<Freshet, FreshetError> {
        let signups = self
            .signups
            .ok_or_else(|| FreshetError::InvalidArg("no signup service registered".into()))?;
        let metadata = self
            .metadata
            .ok_or_else(|| FreshetError::InvalidArg("no metadata service registered".into()))?;
        let data = self
            .data
            .ok_or_else(|| FreshetError::InvalidArg("no data service registered".into()))?;
        Ok(Freshet {
            signups,
            metadata,
            data,
            cfg: self.cfg,
        })
    }
}
