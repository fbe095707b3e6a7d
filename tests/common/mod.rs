use connector_hub::application::handler::{EventSignal, LastResponseHandler, ResponseHandler};
use connector_hub::domain::request::{
    InboundRequest, MethodDocument, NameValue, PayloadDocument, ResponseMetadata,
};
use connector_hub::domain::state::WorkflowState;
use connector_hub::error::Result;
use connector_hub::infrastructure::in_memory::{RecordedEvent, RecordingNotifier};
use serde_json::Value;
use std::time::Duration;

/// The deposit-list body used by the chained-call scenarios: the dependent
/// identifier is the second array element's accountId.
#[allow(dead_code)]
pub const DEPOSIT_BODY: &str = r#"{"accountContainer":{"depositMessage":{"depositList":{"deposit":[{"accountId":"A1"},{"accountId":"A2"}]}}}}"#;

pub fn payload_request(pairs: &[(&str, &str)]) -> InboundRequest {
    InboundRequest::with_payload(
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string())),
    )
}

/// A request spreading parameters across all three sources, for exercising
/// the merge priority end to end.
#[allow(dead_code)]
pub fn layered_request() -> InboundRequest {
    InboundRequest {
        payload: Some(PayloadDocument {
            parameters: vec![NameValue::new("accountId", "primary")],
        }),
        metadata: Some(ResponseMetadata {
            parameters: vec![
                NameValue::new("accountId", "flat"),
                NameValue::new("org", "demo"),
            ],
            method: Some(MethodDocument {
                parameters: vec![NameValue::new("memberId", "M1")],
            }),
        }),
    }
}

/// A handler that post-processes like the default but always asks for a
/// realtime event, for exercising the Complete-stage notification path.
#[allow(dead_code)]
pub struct SignalingHandler {
    pub event: String,
    pub affected: Vec<String>,
}

impl ResponseHandler for SignalingHandler {
    fn build(&self, state: &WorkflowState) -> Result<Value> {
        LastResponseHandler.build(state)
    }

    fn events(&self, _state: &WorkflowState) -> Option<EventSignal> {
        Some(EventSignal {
            event: self.event.clone(),
            affected: self.affected.clone(),
        })
    }
}

/// Waits for the detached notification task to land, bounded so a broken
/// fire path fails the test instead of hanging it.
#[allow(dead_code)]
pub async fn wait_for_events(notifier: &RecordingNotifier, count: usize) -> Vec<RecordedEvent> {
    for _ in 0..100 {
        let events = notifier.events().await;
        if events.len() >= count {
            return events;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    notifier.events().await
}
