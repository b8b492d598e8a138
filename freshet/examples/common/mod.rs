use std::sync::Arc;

use freshet::{Freshet, HubConfig};

/// Build the facade against the in-memory hub when
/// `FRESHET_EXAMPLES_USE_MOCK` is set (CI), otherwise against the real hub
/// configured in `appsettings.json`.
#[must_use]
pub fn get_freshet() -> Freshet {
    if std::env::var("FRESHET_EXAMPLES_USE_MOCK").is_ok() {
        println!("--- (Using in-memory hub for CI) ---");
        Freshet::builder()
            .with_hub(Arc::new(freshet_mock::MockHub::new()))
            .build()
            .expect("all services registered")
    } else {
        let raw = std::fs::read_to_string("appsettings.json")
            .expect("appsettings.json next to the example");
        let cfg: HubConfig = serde_json::from_str(&raw).expect("valid appsettings.json");
        let hub = Arc::new(freshet_datahub::HubClient::from_config(&cfg).expect("valid hub config"));
        Freshet::builder().with_hub(hub).build().expect("all services registered")
    }
}
