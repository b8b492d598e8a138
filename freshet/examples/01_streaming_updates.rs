//! The basic streaming-updates walkthrough: create a type and streams,
//! subscribe to them, write data, poll for updates, grow the subscription,
//! and tear everything down.

mod common;

use chrono::Utc;
use common::get_freshet;
use freshet::{Change, Page, ResourceFilter, StreamDef, TypeDef};
use serde::Serialize;

const TYPE_ID: &str = "simpleSdsType";
const STREAM_PREFIX: &str = "stream_";
const NEW_STREAM: &str = "newStream";
const STREAMS_TO_CREATE: usize = 3;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimpleEvent {
    timestamp: chrono::DateTime<Utc>,
    value: f64,
}

fn sample_events() -> Vec<SimpleEvent> {
    [10.0, 20.0, 30.0]
        .into_iter()
        .map(|value| SimpleEvent {
            timestamp: Utc::now(),
            value,
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Beginning streaming-updates sample");

    // Step 1: services behind the facade (mock hub in CI).
    let freshet = get_freshet();

    // Step 2: a simple timestamp-keyed type.
    println!("Step 2: Creating type {TYPE_ID}");
    let ty = freshet
        .get_or_create_type(&TypeDef::timestamped_double(TYPE_ID))
        .await?;

    // Step 3: streams of that type.
    println!("Step 3: Creating {STREAMS_TO_CREATE} streams");
    let mut stream_ids = Vec::new();
    for i in 0..STREAMS_TO_CREATE {
        let def = StreamDef::new(format!("{STREAM_PREFIX}{i}"), &ty.id)
            .with_description(format!("Stream {i} for streaming updates"));
        stream_ids.push(freshet.get_or_create_stream(&def).await?.id);
    }

    // Step 4: a signup over all of them.
    println!("Step 4: Creating signup");
    let signup = freshet
        .create_signup("signupSample", stream_ids.clone())
        .await?;
    println!(
        "Signup {} has been created and is {:?}",
        signup.id, signup.signup_state
    );

    let run = run_walkthrough(&freshet, &signup.id, &stream_ids).await;

    // Step 11: teardown runs even when an earlier step failed, and one
    // failed deletion does not stop the rest.
    println!("Step 11: Cleaning up");
    let cleanup = freshet
        .teardown()
        .signup(&signup.id)
        .streams(stream_ids)
        .stream(NEW_STREAM)
        .r#type(&ty.id)
        .run()
        .await;

    run?;
    cleanup?;
    Ok(())
}

async fn run_walkthrough(
    freshet: &freshet::Freshet,
    signup_id: &str,
    stream_ids: &[String],
) -> Result<(), Box<dyn std::error::Error>> {
    // Step 5: activation is backend-driven; wait it out with backoff.
    println!("Step 5: Activating signup");
    let mut poller = freshet.wait_until_active(signup_id).await?;
    println!("Signup is now Active");

    // Step 6: which resources can we actually read?
    println!("Step 6: Get signup resources");
    for resource in freshet
        .resources(signup_id, Page::default(), ResourceFilter::All)
        .await?
    {
        println!(
            "Resource: {}, Accessible: {}",
            resource.resource_id, resource.is_accessible
        );
    }

    // Step 7: write three events into each stream.
    println!("Step 7: Writing events to the streams");
    for stream_id in stream_ids {
        freshet.insert_values(stream_id, &sample_events()).await?;
    }

    // Step 8: poll updates with the activation bookmark.
    println!("Step 8: Get updates");
    for update in freshet.wait_for_updates(&mut poller).await? {
        match &update.change {
            Change::Insert(events) => {
                println!("Update: {} Insert", update.resource_id);
                for event in events {
                    println!("\t{event}");
                }
            }
            other => println!("Update: {} {other:?}", update.resource_id),
        }
    }

    // Step 9: grow the subscription with a new stream.
    println!("Step 9: Updating signup resources");
    freshet
        .get_or_create_stream(
            &StreamDef::new(NEW_STREAM, TYPE_ID)
                .with_description("New stream for streaming updates"),
        )
        .await?;
    freshet
        .add_resources(signup_id, vec![NEW_STREAM.to_string()])
        .await?;

    // Step 10: the new stream may take a moment to become accessible.
    println!("Step 10: Get signup resources");
    for resource in freshet
        .wait_until_accessible(signup_id, &[NEW_STREAM.to_string()])
        .await?
    {
        println!(
            "Resource: {}, Accessible: {}",
            resource.resource_id, resource.is_accessible
        );
    }

    Ok(())
}
