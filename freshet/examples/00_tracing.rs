mod common;

use common::get_freshet;
use freshet::{StreamDef, TypeDef};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize a human-friendly tracing subscriber with env-based filtering.
    // Suggested: RUST_LOG=info,freshet=trace,freshet_datahub=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let freshet = get_freshet();

    // A minimal end-to-end pass: one type, one stream, one signup.
    let ty = freshet
        .get_or_create_type(&TypeDef::timestamped_double("tracingType"))
        .await?;
    let stream = freshet
        .get_or_create_stream(&StreamDef::new("tracingStream", &ty.id))
        .await?;
    let signup = freshet
        .create_signup("tracingSignup", vec![stream.id.clone()])
        .await?;
    let mut poller = freshet.wait_until_active(&signup.id).await?;
    let _ = freshet.poll_updates(&mut poller).await?;

    freshet
        .teardown()
        .signup(&signup.id)
        .stream(&stream.id)
        .r#type(&ty.id)
        .run()
        .await?;

    Ok(())
}
