//! End-to-end lifecycle tests for the live activity bridge, driven through
//! the command dispatcher with a recording fake of the OS service.

use serde_json::{json, Value as JsonValue};
use std::sync::Arc;
use vigil_bridge::{
    CapabilityGate, CommandDispatcher, CommandReply, LifecycleManager, OsVersion, MIN_ACTIVITY_OS,
};
use vigil_core::BridgeError;
use vigil_test_utils::FakeActivityService;

fn bridge_at(version: OsVersion, service: &FakeActivityService) -> CommandDispatcher {
    CommandDispatcher::new(LifecycleManager::new(CapabilityGate::new(
        version,
        Arc::new(service.clone()),
    )))
}

fn bridge(service: &FakeActivityService) -> CommandDispatcher {
    bridge_at(MIN_ACTIVITY_OS, service)
}

fn start_args() -> JsonValue {
    json!({
        "agentType": "build",
        "agentEmoji": "🛠",
        "agentName": "Builder",
        "message": "starting"
    })
}

fn update_args(message: &str) -> JsonValue {
    json!({
        "agentType": "build",
        "agentEmoji": "🛠",
        "agentName": "Builder",
        "message": message
    })
}

#[tokio::test]
async fn is_supported_false_below_minimum_version_even_when_enabled() {
    let service = FakeActivityService::new();
    let dispatcher = bridge_at(OsVersion::new(16, 1), &service);

    let reply = dispatcher
        .handle("isSupported", &JsonValue::Null)
        .await
        .unwrap();
    assert_eq!(reply, CommandReply::Bool(false));
}

#[tokio::test]
async fn is_supported_false_when_disabled() {
    let service = FakeActivityService::disabled();
    let dispatcher = bridge(&service);

    let reply = dispatcher
        .handle("isSupported", &JsonValue::Null)
        .await
        .unwrap();
    assert_eq!(reply, CommandReply::Bool(false));
}

#[tokio::test]
async fn start_with_missing_field_creates_no_handle() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);

    let err = dispatcher
        .handle("start", &json!({"agentType": "build"}))
        .await
        .unwrap_err();
    assert_eq!(err.code(), "INVALID_ARGS");
    assert!(service.requests().is_empty());

    // The handle stayed absent: update still reports NoActivity.
    let err = dispatcher
        .handle("update", &update_args("50%"))
        .await
        .unwrap_err();
    assert_eq!(err, BridgeError::NoActivity);
}

#[tokio::test]
async fn start_when_disabled_leaves_handle_absent() {
    let service = FakeActivityService::disabled();
    let dispatcher = bridge(&service);

    let err = dispatcher.handle("start", &start_args()).await.unwrap_err();
    assert_eq!(err, BridgeError::Disabled);
    assert!(service.requests().is_empty());

    let err = dispatcher
        .handle("update", &update_args("50%"))
        .await
        .unwrap_err();
    assert_eq!(err, BridgeError::NoActivity);
}

#[tokio::test]
async fn start_below_minimum_version_is_unsupported_before_authorization() {
    // Disabled AND below the version gate: version failure must win.
    let service = FakeActivityService::disabled();
    let dispatcher = bridge_at(OsVersion::new(15, 4), &service);

    let err = dispatcher.handle("start", &start_args()).await.unwrap_err();
    assert_eq!(err, BridgeError::Unsupported);
}

#[tokio::test]
async fn start_returns_identifier_and_initial_state_has_flags_clear() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);

    let reply = dispatcher.handle("start", &start_args()).await.unwrap();
    let CommandReply::Id(id) = reply else {
        panic!("start must reply with an identifier");
    };
    assert!(id.as_str().starts_with("activity_"));

    let requests = service.requests();
    assert_eq!(requests.len(), 1);
    let (attributes, initial) = &requests[0];
    assert_eq!(attributes.agent_type, "build");
    assert_eq!(attributes.agent_name, "Builder");
    assert_eq!(initial.message, "starting");
    assert!(!initial.is_error);
    assert!(!initial.is_complete);
}

#[tokio::test]
async fn second_start_is_rejected_and_creates_no_second_activity() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);

    dispatcher.handle("start", &start_args()).await.unwrap();
    let err = dispatcher.handle("start", &start_args()).await.unwrap_err();
    assert_eq!(err.code(), "START_FAILED");
    assert_eq!(service.requests().len(), 1);
    assert_eq!(service.live_count(), 1);
}

#[tokio::test]
async fn os_creation_failure_surfaces_diagnostic_and_stays_absent() {
    let service = FakeActivityService::new();
    service.fail_next_start("visibility budget exceeded");
    let dispatcher = bridge(&service);

    let err = dispatcher.handle("start", &start_args()).await.unwrap_err();
    assert_eq!(err.code(), "START_FAILED");
    assert!(err.to_string().contains("visibility budget exceeded"));

    // Bridge remains usable: the next start succeeds.
    dispatcher.handle("start", &start_args()).await.unwrap();
    assert_eq!(service.live_count(), 1);
}

#[tokio::test]
async fn update_while_absent_performs_no_os_call() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);

    let err = dispatcher
        .handle("update", &update_args("50%"))
        .await
        .unwrap_err();
    assert_eq!(err, BridgeError::NoActivity);
    assert!(service.updates().is_empty());
}

#[tokio::test]
async fn sequential_updates_replace_state_in_order() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);
    dispatcher.handle("start", &start_args()).await.unwrap();

    let mut with_flags = update_args("failing");
    with_flags["isError"] = json!(true);
    dispatcher.handle("update", &update_args("25%")).await.unwrap();
    dispatcher.handle("update", &update_args("50%")).await.unwrap();
    dispatcher.handle("update", &with_flags).await.unwrap();

    let updates = service.updates();
    assert_eq!(updates.len(), 3);
    assert_eq!(updates[0].message, "25%");
    assert!(!updates[0].is_error);
    assert!(!updates[0].is_complete);
    assert_eq!(updates[1].message, "50%");
    assert_eq!(updates[2].message, "failing");
    assert!(updates[2].is_error);
    assert!(!updates[2].is_complete);
    assert!(updates[0].timestamp <= updates[1].timestamp);
    assert!(updates[1].timestamp <= updates[2].timestamp);
}

#[tokio::test]
async fn end_clears_handle_even_when_os_reports_failure() {
    let service = FakeActivityService::new();
    service.fail_end("surface already dismissed");
    let dispatcher = bridge(&service);
    dispatcher.handle("start", &start_args()).await.unwrap();

    let reply = dispatcher.handle("end", &JsonValue::Null).await.unwrap();
    assert_eq!(reply, CommandReply::Empty);
    assert_eq!(service.ends().len(), 1);

    // Handle cleared: update now fails, and a fresh start is accepted.
    let err = dispatcher
        .handle("update", &update_args("late"))
        .await
        .unwrap_err();
    assert_eq!(err, BridgeError::NoActivity);
    dispatcher.handle("start", &start_args()).await.unwrap();
}

#[tokio::test]
async fn end_while_absent_is_idempotent_success() {
    let service = FakeActivityService::new();
    let dispatcher = bridge(&service);

    let reply = dispatcher.handle("end", &JsonValue::Null).await.unwrap();
    assert_eq!(reply, CommandReply::Empty);
    assert!(service.ends().is_empty());
}

#[tokio::test]
async fn full_scenario_through_command_channel() {
    let service = FakeActivityService::new();
    let handle = bridge(&service).serve(16);

    // start -> returns "activity_<id>"
    let reply = handle.call("start", start_args()).await.unwrap().unwrap();
    let CommandReply::Id(id) = reply else {
        panic!("start must reply with an identifier");
    };
    assert!(id.as_str().starts_with("activity_"));

    // update -> success, no return value
    let reply = handle
        .call("update", update_args("50%"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reply, CommandReply::Empty);

    // terminal update with isComplete
    let mut done = update_args("done");
    done["isComplete"] = json!(true);
    handle.call("update", done).await.unwrap().unwrap();
    let updates = service.updates();
    assert!(updates.last().unwrap().is_complete);

    // end -> success; second end -> idempotent success
    handle
        .call("end", JsonValue::Null)
        .await
        .unwrap()
        .unwrap();
    handle
        .call("end", JsonValue::Null)
        .await
        .unwrap()
        .unwrap();

    // subsequent update -> NO_ACTIVITY
    let err = handle
        .call("update", update_args("too late"))
        .await
        .unwrap()
        .unwrap_err();
    assert_eq!(err, BridgeError::NoActivity);

    assert_eq!(service.live_count(), 0);
}
