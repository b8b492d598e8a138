use freshet_types::{
    Bookmark, Change, CreateSignupInput, HubConfig, ResourceChanges, Signup, SignupResources,
    SignupState, StreamUpdate, UpdateBatch,
};
use serde_json::json;

#[test]
fn create_signup_input_matches_wire_shape() {
    let input = CreateSignupInput::streams("signupSample", vec!["stream_0".into(), "stream_1".into()]);
    let wire = serde_json::to_value(&input).unwrap();
    assert_eq!(
        wire,
        json!({
            "name": "signupSample",
            "resourceType": "Stream",
            "resourceIds": ["stream_0", "stream_1"]
        })
    );
}

#[test]
fn resource_changes_serialize_both_lists() {
    let changes = ResourceChanges {
        resources_to_add: vec!["newStream".into()],
        resources_to_remove: vec![],
    };
    let wire = serde_json::to_value(&changes).unwrap();
    assert_eq!(
        wire,
        json!({"resourcesToAdd": ["newStream"], "resourcesToRemove": []})
    );
}

#[test]
fn active_signup_with_bookmark_round_trips() {
    let wire = json!({
        "id": "sg-1",
        "name": "signupSample",
        "type": "Stream",
        "signupState": "Active",
        "createdDate": "2024-05-01T00:00:00Z",
        "modifiedDate": "2024-05-01T00:00:05Z",
        "bookmark": "bm-0"
    });
    let signup: Signup = serde_json::from_value(wire).unwrap();
    assert_eq!(signup.signup_state, SignupState::Active);
    assert_eq!(signup.bookmark, Some(Bookmark::new("bm-0")));
    assert!(!signup.signup_state.is_pre_active());
}

#[test]
fn mixed_operation_batch_deserializes() {
    let wire = json!({
        "bookmark": "bm-9",
        "data": [
            {
                "resourceId": "simpleStream_0",
                "operation": "Update",
                "events": [{"timestamp": "2024-05-01T12:00:00Z", "value": 3.14}]
            },
            {
                "resourceId": "simpleStream_0",
                "operation": "Remove",
                "events": [{"timestamp": "2024-05-01T12:00:00Z"}]
            },
            {
                "resourceId": "weatherDataStream_0",
                "operation": "RemoveWindow",
                "events": [{"start": "2024-05-01T00:00:00Z", "end": "2024-05-01T12:00:00Z"}]
            }
        ]
    });

    let batch: UpdateBatch = serde_json::from_value(wire).unwrap();
    assert_eq!(batch.data.len(), 3);
    let ops: Vec<&str> = batch
        .data
        .iter()
        .map(|u: &StreamUpdate| match &u.change {
            Change::Insert(_) => "Insert",
            Change::Update(_) => "Update",
            Change::Replace(_) => "Replace",
            Change::Remove(_) => "Remove",
            Change::RemoveWindow(_) => "RemoveWindow",
        })
        .collect();
    assert_eq!(ops, ["Update", "Remove", "RemoveWindow"]);
}

#[test]
fn empty_batch_is_valid() {
    let batch: UpdateBatch = serde_json::from_value(json!({"bookmark": "bm-3", "data": []})).unwrap();
    assert!(batch.is_empty());
}

#[test]
fn hub_config_reads_appsettings_shape() {
    let cfg: HubConfig = serde_json::from_value(json!({
        "resource": "https://hub.example.invalid",
        "apiVersion": "v1",
        "tenantId": "tenant",
        "namespaceId": "ns",
        "clientId": "cid",
        "clientSecret": "secret"
    }))
    .unwrap();
    assert_eq!(cfg.api_version, "v1");
}

#[test]
fn resources_envelope_round_trips() {
    let wire = json!({
        "resources": [
            {"resourceId": "stream_0", "isAccessible": true},
            {"resourceId": "newStream", "isAccessible": false}
        ]
    });
    let resources: SignupResources = serde_json::from_value(wire.clone()).unwrap();
    assert_eq!(resources.resources.len(), 2);
    assert!(!resources.resources[1].is_accessible);
    assert_eq!(serde_json::to_value(&resources).unwrap(), wire);
}
