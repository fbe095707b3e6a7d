mod common;

use common::payload_request;
use connector_hub::application::handler::LastResponseHandler;
use connector_hub::application::pipeline::{CallPlan, Pipeline};
use connector_hub::domain::call::ConnectorCallSpec;
use connector_hub::infrastructure::in_memory::StaticConnectorClient;
use std::sync::Arc;

fn plan(operation: &str) -> CallPlan {
    CallPlan::new(ConnectorCallSpec::new("corebank", "1.0", operation))
}

#[tokio::test]
async fn test_fanout_merges_all_branches_and_post_processes() {
    let client = StaticConnectorClient::new()
        .with_response("getAccounts", r#"{"accounts":[]}"#)
        .with_response("getTransactions", r#"{"transactions":[]}"#)
        .with_response("getTransactionCategories", r#"{"categories":[]}"#);
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    let response = pipeline
        .run_fanout(
            payload_request(&[]),
            vec![
                plan("getAccounts"),
                plan("getTransactions"),
                plan("getTransactionCategories"),
            ],
            &LastResponseHandler,
        )
        .await;

    // All three branches dispatched; the last branch in submission order
    // determines the payload.
    assert_eq!(client.calls().await.len(), 3);
    assert_eq!(response.to_string(), r#"{"response":{"categories":[]}}"#);
}

#[tokio::test]
async fn test_failing_branch_fails_the_whole_aggregate() {
    let client = StaticConnectorClient::new()
        .with_response("getAccounts", r#"{"accounts":[]}"#)
        .with_fault("getTransactions", "timed out")
        .with_response("getTransactionCategories", r#"{"categories":[]}"#);
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    let response = pipeline
        .run_fanout(
            payload_request(&[]),
            vec![
                plan("getAccounts"),
                plan("getTransactions"),
                plan("getTransactionCategories"),
            ],
            &LastResponseHandler,
        )
        .await;

    // Branches 0 and 2 succeeded but their data is discarded, not merged.
    assert!(response.is_failure());
    assert_eq!(
        response.message(),
        Some(
            "aggregate : branch 1 failed: connector call failed: transport failure: timed out"
        )
    );
}

#[tokio::test]
async fn test_single_branch_fanout_behaves_like_single_call() {
    let client = StaticConnectorClient::new().with_response("getAccounts", r#"{"accounts":[]}"#);
    let pipeline = Pipeline::new(Arc::new(client));

    let response = pipeline
        .run_fanout(payload_request(&[]), vec![plan("getAccounts")], &LastResponseHandler)
        .await;

    assert_eq!(response.to_string(), r#"{"response":{"accounts":[]}}"#);
}

#[tokio::test]
async fn test_branches_project_independently() {
    let client = StaticConnectorClient::new()
        .with_response("getAccounts", "{}")
        .with_response("getTransactions", "{}");
    let pipeline = Pipeline::new(Arc::new(client.clone()));

    let accounts_plan = plan("getAccounts").with_projection(
        connector_hub::application::projection::Projection::identity().copy(["accountId"]),
    );
    let transactions_plan = plan("getTransactions");

    pipeline
        .run_fanout(
            payload_request(&[("accountId", "A1"), ("org", "demo")]),
            vec![accounts_plan, transactions_plan],
            &LastResponseHandler,
        )
        .await;

    let calls = client.calls().await;
    assert_eq!(calls.len(), 2);
    let accounts_call = calls.iter().find(|(spec, _)| spec.operation == "getAccounts").unwrap();
    let transactions_call = calls
        .iter()
        .find(|(spec, _)| spec.operation == "getTransactions")
        .unwrap();

    // The projected branch only forwarded its listed parameter; the
    // identity branch forwarded the whole merged bag.
    assert_eq!(accounts_call.1.len(), 1);
    assert_eq!(accounts_call.1.get("accountId"), Some("A1"));
    assert_eq!(transactions_call.1.get("org"), Some("demo"));
}
