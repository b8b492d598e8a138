//! The change-broker walkthrough: mixed stream types, every update
//! operation (insert, update, replace, remove, remove-window), a second
//! bookmark poll, additional signups with a paged listing, and teardown.

mod common;

use chrono::Utc;
use common::get_freshet;
use freshet::{Change, Freshet, Page, ResourceFilter, StreamDef, TypeDef};
use serde::Serialize;

const SIMPLE_TYPE_ID: &str = "simpleSdsType";
const WEATHER_TYPE_ID: &str = "weatherDataType";
const SIMPLE_PREFIX: &str = "simpleStream_";
const WEATHER_PREFIX: &str = "weatherDataStream_";
const SIMPLE_STREAMS: usize = 2;
const WEATHER_STREAMS: usize = 1;
const ADDITIONAL_SIGNUPS: usize = 2;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SimpleEvent {
    timestamp: chrono::DateTime<Utc>,
    value: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeatherEvent {
    timestamp: chrono::DateTime<Utc>,
    humidity: f64,
    temperature: f64,
}

fn print_updates(updates: &[freshet::StreamUpdate]) {
    for update in updates {
        println!("id: {}", update.resource_id);
        match &update.change {
            Change::Insert(events) | Change::Update(events) | Change::Replace(events) => {
                for event in events {
                    println!("\t{event}");
                }
            }
            Change::Remove(removed) => {
                for event in removed {
                    println!("\tremoved at {}", event.timestamp);
                }
            }
            Change::RemoveWindow(windows) => {
                for window in windows {
                    println!("\twindow {} .. {}", window.start, window.end);
                }
            }
        }
        println!();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Beginning change-broker sample");
    let start_time = Utc::now();

    let freshet = get_freshet();

    // Step 2: two types this time.
    println!("Step 2: Creating types");
    let simple_type = freshet
        .get_or_create_type(&TypeDef::timestamped_double(SIMPLE_TYPE_ID))
        .await?;
    let weather_type = freshet
        .get_or_create_type(&TypeDef::timestamped_double(WEATHER_TYPE_ID))
        .await?;

    // Step 3: streams of both types.
    println!("Step 3: Creating streams");
    let mut simple_ids = Vec::new();
    for i in 0..SIMPLE_STREAMS {
        let def = StreamDef::new(format!("{SIMPLE_PREFIX}{i}"), &simple_type.id)
            .with_description("Simple stream for the change broker");
        simple_ids.push(freshet.get_or_create_stream(&def).await?.id);
    }
    let mut weather_ids = Vec::new();
    for i in 0..WEATHER_STREAMS {
        let def = StreamDef::new(format!("{WEATHER_PREFIX}{i}"), &weather_type.id)
            .with_description("Weather data stream for the change broker");
        weather_ids.push(freshet.get_or_create_stream(&def).await?.id);
    }
    let mut all_streams = simple_ids.clone();
    all_streams.extend(weather_ids.clone());

    // Step 4: the main signup.
    println!("Step 4: Creating signup");
    let signup = freshet
        .create_signup("signupSample", all_streams.clone())
        .await?;
    println!(
        "Signup {} has been created and is {:?}",
        signup.id, signup.signup_state
    );
    let mut signup_ids = vec![signup.id.clone()];

    let run = run_walkthrough(
        &freshet,
        &signup.id,
        &mut signup_ids,
        &simple_ids,
        &mut weather_ids,
        &all_streams,
        start_time,
    )
    .await;

    // Step 14: delete every signup, stream, and type, reporting all
    // failures only after the whole sequence ran.
    println!("Step 14: Cleaning up");
    let cleanup = freshet
        .teardown()
        .signups(signup_ids)
        .streams(simple_ids)
        .streams(weather_ids)
        .r#type(&simple_type.id)
        .r#type(&weather_type.id)
        .run()
        .await;

    run?;
    cleanup?;
    Ok(())
}

#[allow(clippy::too_many_lines)]
async fn run_walkthrough(
    freshet: &Freshet,
    signup_id: &str,
    signup_ids: &mut Vec<String>,
    simple_ids: &[String],
    weather_ids: &mut Vec<String>,
    all_streams: &[String],
    start_time: chrono::DateTime<Utc>,
) -> Result<(), Box<dyn std::error::Error>> {
    // Step 5: wait out activation; only an active signup has a bookmark.
    println!("Step 5: Activating signup");
    let mut poller = freshet.wait_until_active(signup_id).await?;
    println!("Signup is now Active");

    // Step 6: resource accessibility.
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

    // Step 7: insert into every stream.
    println!("Step 7: Writing insert operations to the streams");
    for stream_id in simple_ids {
        let events: Vec<SimpleEvent> = [10.0, 20.0, 30.0]
            .into_iter()
            .map(|value| SimpleEvent {
                timestamp: Utc::now(),
                value,
            })
            .collect();
        freshet.insert_values(stream_id, &events).await?;
    }
    for stream_id in weather_ids.iter() {
        let events: Vec<WeatherEvent> = [(40.0, 25.0), (40.1, 25.1)]
            .into_iter()
            .map(|(humidity, temperature)| WeatherEvent {
                timestamp: Utc::now(),
                humidity,
                temperature,
            })
            .collect();
        freshet.insert_values(stream_id, &events).await?;
    }

    // Step 8: first updates poll.
    println!("Step 8: Get updates");
    let updates = freshet.wait_for_updates(&mut poller).await?;
    print_updates(&updates);

    // Step 9: subscribe an additional weather stream.
    println!("Step 9: Updating signup resources with a new weather stream");
    let new_stream = freshet
        .get_or_create_stream(
            &StreamDef::new(format!("{WEATHER_PREFIX}New_0"), WEATHER_TYPE_ID)
                .with_description("New weather data stream for the change broker"),
        )
        .await?;
    freshet
        .add_resources(signup_id, vec![new_stream.id.clone()])
        .await?;
    weather_ids.push(new_stream.id.clone());

    // Step 10: filtered, paged resource query; the new stream may still be
    // reconciling.
    println!("Step 10: Get signup resources");
    let page = Page {
        skip: 0,
        count: (all_streams.len() + 1) as u32,
    };
    for resource in freshet
        .resources(signup_id, page, ResourceFilter::All)
        .await?
    {
        println!(
            "Resource: {}, Accessible: {}",
            resource.resource_id, resource.is_accessible
        );
    }

    // Step 11: the non-insert operations.
    println!("Step 11: Writing update, replace, remove and remove-window operations");
    let timestamp = Utc::now();
    let simple_stream = &simple_ids[0];
    freshet
        .update_value(simple_stream, &SimpleEvent { timestamp, value: 3.14 })
        .await?;
    freshet
        .replace_value(simple_stream, &SimpleEvent { timestamp, value: 6.28 })
        .await?;
    freshet.remove_value(simple_stream, timestamp).await?;

    // Delete the previously written weather events in one window.
    let weather_stream = &weather_ids[0];
    freshet
        .remove_window_values(weather_stream, start_time, timestamp)
        .await?;

    // Step 12: poll again with the bookmark from step 8's batch.
    println!("Step 12: Get updates");
    let updates = freshet.wait_for_updates(&mut poller).await?;
    print_updates(&updates);

    // Step 13: additional signups show up in the paged listing without
    // being activated first.
    println!("Step 13: Get all signups");
    for i in 0..ADDITIONAL_SIGNUPS {
        let additional = freshet
            .create_signup(&format!("signupSample_{i}"), all_streams.to_vec())
            .await?;
        signup_ids.push(additional.id);
    }
    let page = Page {
        skip: 0,
        count: (ADDITIONAL_SIGNUPS + 1) as u32,
    };
    for listed in freshet.list_signups(page).await? {
        println!("Signup: {}, Id: {}", listed.name, listed.id);
    }

    Ok(())
}
