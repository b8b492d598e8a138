#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use freshet::{BackoffConfig, Freshet, PollConfig};
use freshet_mock::MockHub;

pub fn fast_poll(deadline_ms: u64) -> PollConfig {
    PollConfig {
        backoff: BackoffConfig {
            initial: Duration::from_millis(1),
            max: Duration::from_millis(4),
            factor: 2,
            jitter_percent: 0,
        },
        deadline: Duration::from_millis(deadline_ms),
    }
}

pub fn freshet_over(hub: &MockHub) -> Freshet {
    Freshet::builder()
        .with_hub(Arc::new(hub.clone()))
        .activation_poll(fast_poll(250))
        .accessibility_poll(fast_poll(250))
        .updates_poll(fast_poll(100))
        .build()
        .expect("all services registered")
}
