mod helpers;

use chrono::{TimeZone, Utc};
use serde::Serialize;

use freshet::{Change, StreamDef, TypeDef};
use freshet_mock::MockHub;
use helpers::freshet_over;

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

fn at(second: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, second).unwrap()
}

/// Two streams of the simple type, one of the weather type, a signup over
/// all three, three inserts into each simple stream: the first poll must
/// yield exactly two Insert records with three events each, in insertion
/// order within each record.
#[tokio::test]
async fn first_poll_after_inserts_matches_write_shape() {
    let hub = MockHub::new();
    let freshet = freshet_over(&hub);

    let simple = freshet
        .get_or_create_type(&TypeDef::timestamped_double("simpleType"))
        .await
        .unwrap();
    let weather = freshet
        .get_or_create_type(&TypeDef::timestamped_double("weatherType"))
        .await
        .unwrap();

    let mut stream_ids = Vec::new();
    for i in 0..2 {
        let def = StreamDef::new(format!("simpleStream_{i}"), &simple.id)
            .with_description("simple stream for updates");
        stream_ids.push(freshet.get_or_create_stream(&def).await.unwrap().id);
    }
    let weather_stream = freshet
        .get_or_create_stream(&StreamDef::new("weatherDataStream_0", &weather.id))
        .await
        .unwrap();
    stream_ids.push(weather_stream.id);

    let signup = freshet
        .create_signup("signupSample", stream_ids.clone())
        .await
        .unwrap();
    let mut poller = freshet.wait_until_active(&signup.id).await.unwrap();

    for stream_id in &stream_ids[..2] {
        let events: Vec<SimpleEvent> = (0..3)
            .map(|i| SimpleEvent {
                timestamp: at(i),
                value: f64::from(10 * (i + 1)),
            })
            .collect();
        freshet.insert_values(stream_id, &events).await.unwrap();
    }

    let updates = freshet.wait_for_updates(&mut poller).await.unwrap();
    assert_eq!(updates.len(), 2, "one Insert record per written stream");
    for update in &updates {
        assert!(
            update.resource_id.starts_with("simpleStream_"),
            "weather stream saw no writes"
        );
        match &update.change {
            Change::Insert(events) => {
                assert_eq!(events.len(), 3);
                let values: Vec<f64> =
                    events.iter().map(|e| e["value"].as_f64().unwrap()).collect();
                assert_eq!(values, [10.0, 20.0, 30.0], "insertion order preserved");
            }
            other => panic!("expected Insert, got {other:?}"),
        }
    }
}

/// The second walkthrough's operation mix: update, replace, remove on a
/// simple stream and a window removal on the weather stream, polled with
/// the bookmark from the first batch.
#[tokio::test]
async fn second_poll_sees_non_insert_operations() {
    let hub = MockHub::new();
    let freshet = freshet_over(&hub);

    let ty = freshet
        .get_or_create_type(&TypeDef::timestamped_double("simpleType"))
        .await
        .unwrap();
    let simple = freshet
        .get_or_create_stream(&StreamDef::new("simpleStream_0", &ty.id))
        .await
        .unwrap();
    let weather = freshet
        .get_or_create_stream(&StreamDef::new("weatherDataStream_0", &ty.id))
        .await
        .unwrap();

    let signup = freshet
        .create_signup("signupSample", vec![simple.id.clone(), weather.id.clone()])
        .await
        .unwrap();
    let mut poller = freshet.wait_until_active(&signup.id).await.unwrap();

    freshet
        .insert_values(
            &weather.id,
            &[WeatherEvent {
                timestamp: at(0),
                humidity: 40.0,
                temperature: 25.0,
            }],
        )
        .await
        .unwrap();
    let first = freshet.wait_for_updates(&mut poller).await.unwrap();
    assert_eq!(first.len(), 1);

    let ts = at(30);
    freshet
        .update_value(&simple.id, &SimpleEvent { timestamp: ts, value: 3.14 })
        .await
        .unwrap();
    freshet
        .replace_value(&simple.id, &SimpleEvent { timestamp: ts, value: 6.28 })
        .await
        .unwrap();
    freshet.remove_value(&simple.id, ts).await.unwrap();
    freshet
        .remove_window_values(&weather.id, at(0), ts)
        .await
        .unwrap();

    let second = freshet.wait_for_updates(&mut poller).await.unwrap();
    let mut simple_ops = Vec::new();
    let mut weather_ops = Vec::new();
    for update in &second {
        let tag = match &update.change {
            Change::Insert(_) => "Insert",
            Change::Update(_) => "Update",
            Change::Replace(_) => "Replace",
            Change::Remove(removed) => {
                assert_eq!(removed[0].timestamp, ts);
                "Remove"
            }
            Change::RemoveWindow(windows) => {
                assert_eq!((windows[0].start, windows[0].end), (at(0), ts));
                "RemoveWindow"
            }
        };
        if update.resource_id == simple.id {
            simple_ops.push(tag);
        } else {
            weather_ops.push(tag);
        }
    }
    // Per-resource operation order is write order; cross-resource order is
    // unspecified, so assert per resource only.
    assert_eq!(simple_ops, ["Update", "Replace", "Remove"]);
    assert_eq!(weather_ops, ["RemoveWindow"]);

    // Nothing is re-delivered on the next poll.
    let third = freshet.poll_updates(&mut poller).await.unwrap();
    assert!(third.is_empty());
}
