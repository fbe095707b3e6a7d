use crate::domain::state::WorkflowState;
use crate::error::Result;
use serde_json::Value;
use tracing::debug;

/// A realtime event the Complete stage should fire for this outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSignal {
    pub event: String,
    pub affected: Vec<String>,
}

/// Builds the caller-facing payload out of the collected responses.
///
/// One implementation per endpoint family; handlers are plain values
/// injected into the pipeline rather than a subclass hierarchy. `events`
/// lets a handler request a best-effort notification for selected
/// outcomes; the default is none.
pub trait ResponseHandler: Send + Sync {
    fn build(&self, state: &WorkflowState) -> Result<Value>;

    fn events(&self, _state: &WorkflowState) -> Option<EventSignal> {
        None
    }
}

/// The structural default: iterate the collected responses and let the last
/// one's payload determine the output. With no responses at all the payload
/// is the literal `1` placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastResponseHandler;

impl ResponseHandler for LastResponseHandler {
    fn build(&self, state: &WorkflowState) -> Result<Value> {
        let mut payload = Value::from(1);
        for response in state.responses() {
            debug!(
                connector = %response.spec.connector,
                operation = %response.spec.operation,
                "post-processing connector response"
            );
            // Bodies are normally JSON; anything else is carried through as
            // a JSON string.
            payload = serde_json::from_str(&response.body)
                .unwrap_or_else(|_| Value::String(response.body.clone()));
        }
        Ok(payload)
    }
}
