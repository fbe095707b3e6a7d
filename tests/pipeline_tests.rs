mod common;

use common::{SignalingHandler, layered_request, payload_request, wait_for_events};
use connector_hub::application::handler::LastResponseHandler;
use connector_hub::application::pipeline::{CallPlan, Pipeline};
use connector_hub::application::projection::Projection;
use connector_hub::domain::call::ConnectorCallSpec;
use connector_hub::infrastructure::in_memory::{RecordingNotifier, StaticConnectorClient};
use std::sync::Arc;

fn transactions_plan() -> CallPlan {
    CallPlan::new(ConnectorCallSpec::new("corebank", "1.0", "getTransactions")).with_projection(
        Projection::identity()
            .copy(["accountId"])
            .expand_json("filters"),
    )
}

#[tokio::test]
async fn test_single_call_success_envelope() {
    let client = StaticConnectorClient::new()
        .with_response("getTransactions", r#"{"transactions":[{"id":"T1"}]}"#);
    let pipeline = Pipeline::new(Arc::new(client));

    let response = pipeline
        .run(
            payload_request(&[("accountId", "A1")]),
            transactions_plan(),
            &LastResponseHandler,
        )
        .await;

    assert_eq!(
        response.to_string(),
        r#"{"response":{"transactions":[{"id":"T1"}]}}"#
    );
    assert!(!response.is_failure());
}

#[tokio::test]
async fn test_valid_filter_expands_into_dispatch_params() {
    let client = StaticConnectorClient::new().with_response("getTransactions", "{}");
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    pipeline
        .run(
            payload_request(&[("accountId", "A1"), ("filters", r#"{"amount":"10"}"#)]),
            transactions_plan(),
            &LastResponseHandler,
        )
        .await;

    let calls = client.calls().await;
    assert_eq!(calls.len(), 1);
    let params = &calls[0].1;
    assert_eq!(params.get("accountId"), Some("A1"));
    assert_eq!(params.get("amount"), Some("10"));
}

#[tokio::test]
async fn test_malformed_filter_is_dropped_and_call_still_dispatches() {
    let client = StaticConnectorClient::new().with_response("getTransactions", "{}");
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    let response = pipeline
        .run(
            payload_request(&[("accountId", "A1"), ("filters", "notjson")]),
            transactions_plan(),
            &LastResponseHandler,
        )
        .await;

    assert!(!response.is_failure());
    let calls = client.calls().await;
    assert_eq!(calls.len(), 1);
    let params = &calls[0].1;
    assert_eq!(params.get("accountId"), Some("A1"));
    assert!(!params.contains("amount"));
    assert!(!params.contains("filters"));
}

#[tokio::test]
async fn test_merged_bag_priority_reaches_the_connector() {
    let client = StaticConnectorClient::new().with_response("getAccounts", "{}");
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    pipeline
        .run(
            layered_request(),
            CallPlan::new(ConnectorCallSpec::new("corebank", "1.0", "getAccounts")),
            &LastResponseHandler,
        )
        .await;

    // Identity projection: the dispatched bag is the priority merge of all
    // three request sources, primary payload winning.
    let calls = client.calls().await;
    let params = &calls[0].1;
    assert_eq!(params.get("accountId"), Some("primary"));
    assert_eq!(params.get("org"), Some("demo"));
    assert_eq!(params.get("memberId"), Some("M1"));
    assert_eq!(params.len(), 3);
}

#[tokio::test]
async fn test_connector_fault_becomes_failure_envelope() {
    let client = StaticConnectorClient::new().with_fault("getTransactions", "connection reset");
    let pipeline = Pipeline::new(Arc::new(client));

    let response = pipeline
        .run(
            payload_request(&[("accountId", "A1")]),
            transactions_plan(),
            &LastResponseHandler,
        )
        .await;

    assert!(response.is_failure());
    assert_eq!(
        response.message(),
        Some("await : connector call failed: transport failure: connection reset")
    );
}

#[tokio::test]
async fn test_unknown_operation_becomes_failure_envelope() {
    let pipeline = Pipeline::new(Arc::new(StaticConnectorClient::new()));

    let response = pipeline
        .run(
            payload_request(&[]),
            CallPlan::new(ConnectorCallSpec::new("corebank", "1.0", "getAccounts")),
            &LastResponseHandler,
        )
        .await;

    assert!(response.is_failure());
    assert_eq!(
        response.message(),
        Some("await : connector call failed: unknown operation 'getAccounts'")
    );
}

#[tokio::test]
async fn test_replaying_identical_request_yields_identical_bytes() {
    let client = StaticConnectorClient::new()
        .with_response("getTransactions", r#"{"transactions":[],"total":"0"}"#);
    let pipeline = Pipeline::new(Arc::new(client));

    let request = payload_request(&[("accountId", "A1"), ("filters", r#"{"amount":"10"}"#)]);
    let first = pipeline
        .run(request.clone(), transactions_plan(), &LastResponseHandler)
        .await;
    let second = pipeline
        .run(request, transactions_plan(), &LastResponseHandler)
        .await;

    assert_eq!(first.to_string(), second.to_string());
}

#[tokio::test]
async fn test_complete_fires_handler_event_signal() {
    let client = StaticConnectorClient::new().with_response("getTransactions", "{}");
    let notifier = RecordingNotifier::new();
    let pipeline = Pipeline::new(Arc::new(client)).with_notifier(Arc::new(notifier.clone()));

    let handler = SignalingHandler {
        event: "transactionsRefreshed".to_string(),
        affected: vec!["A1".to_string()],
    };
    let response = pipeline
        .run(payload_request(&[("accountId", "A1")]), transactions_plan(), &handler)
        .await;

    assert!(!response.is_failure());
    let events = wait_for_events(&notifier, 1).await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, "transactionsRefreshed");
    assert_eq!(events[0].affected, vec!["A1".to_string()]);
}

#[tokio::test]
async fn test_notifier_rejection_never_fails_the_chain() {
    let client = StaticConnectorClient::new().with_response("getTransactions", r#"{"ok":1}"#);
    let notifier = RecordingNotifier::rejecting();
    let pipeline = Pipeline::new(Arc::new(client)).with_notifier(Arc::new(notifier.clone()));

    let handler = SignalingHandler {
        event: "transactionsRefreshed".to_string(),
        affected: vec![],
    };
    let response = pipeline
        .run(payload_request(&[]), transactions_plan(), &handler)
        .await;

    assert!(!response.is_failure());
    assert_eq!(response.to_string(), r#"{"response":{"ok":1}}"#);
    // The attempt still reached the notifier; the rejection was swallowed.
    let events = wait_for_events(&notifier, 1).await;
    assert_eq!(events.len(), 1);
}
