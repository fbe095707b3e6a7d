//! Chaining of two dependent connector calls.
//!
//! The first call always executes. Its response may yield an identifier
//! that the second call needs as a parameter; [`ResponseLink`] describes
//! where to find it and where to put it. The second call always executes,
//! whether or not extraction produced anything.

use crate::application::handler::ResponseHandler;
use crate::application::pipeline::{CallPlan, Pipeline};
use crate::domain::call::ConnectorCallSpec;
use crate::domain::envelope::FinalResponse;
use crate::domain::request::InboundRequest;
use crate::domain::state::WorkflowState;
use crate::error::{StageFailure, WorkflowError};
use serde_json::Value;
use tracing::{debug, warn};

/// Locates the dependent identifier inside the first call's response body
/// and names the parameter it is injected under for the second call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseLink {
    /// JSON pointer to the array holding the candidate elements.
    pub path: String,
    /// Which array element carries the identifier.
    pub index: usize,
    /// The string field read off that element.
    pub field: String,
    /// The parameter name injected for the second call.
    pub param: String,
}

impl ResponseLink {
    pub fn new(
        path: impl Into<String>,
        index: usize,
        field: impl Into<String>,
        param: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            index,
            field: field.into(),
            param: param.into(),
        }
    }

    /// Applies the link to the state between the two calls.
    ///
    /// Extraction only happens when the state holds exactly one response;
    /// with zero or several responses the bag is left untouched and no
    /// extraction is attempted. An extraction miss is not fatal: it is
    /// logged and the empty identifier is injected so the second call still
    /// proceeds.
    pub fn apply(&self, state: &mut WorkflowState) {
        if state.responses().len() != 1 {
            debug!(
                responses = state.responses().len(),
                "skipping dependent extraction, expected exactly one response"
            );
            return;
        }

        let identifier = match self.extract(&state.responses()[0].body) {
            Ok(identifier) => identifier,
            Err(miss) => {
                warn!(%miss, param = %self.param, "dependent identifier extraction failed");
                String::new()
            }
        };
        state.params_mut().set(&self.param, identifier);
    }

    fn extract(&self, body: &str) -> Result<String, WorkflowError> {
        let document: Value = serde_json::from_str(body).map_err(|err| {
            WorkflowError::DependentExtraction {
                detail: format!("response body is not JSON: {err}"),
            }
        })?;
        let candidates = document.pointer(&self.path).ok_or_else(|| {
            WorkflowError::DependentExtraction {
                detail: format!("nothing at '{}'", self.path),
            }
        })?;
        let element = candidates.get(self.index).ok_or_else(|| {
            WorkflowError::DependentExtraction {
                detail: format!("no element {} at '{}'", self.index, self.path),
            }
        })?;
        let identifier = element.get(&self.field).and_then(Value::as_str).ok_or_else(|| {
            WorkflowError::DependentExtraction {
                detail: format!("element {} has no string field '{}'", self.index, self.field),
            }
        })?;
        Ok(identifier.to_string())
    }
}

impl Pipeline {
    /// Runs two dependent calls as one chain: the first call's response
    /// feeds the link, the second call dispatches with the (possibly
    /// augmented) bag, and the combined state is post-processed as usual.
    pub async fn run_chained(
        &self,
        request: InboundRequest,
        first: CallPlan,
        link: ResponseLink,
        second: ConnectorCallSpec,
        handler: &dyn ResponseHandler,
    ) -> FinalResponse {
        let mut state = WorkflowState::new(request);
        let outcome = self
            .chained(&mut state, &first, &link, second, handler)
            .await;
        self.resolve(outcome)
    }

    async fn chained(
        &self,
        state: &mut WorkflowState,
        first: &CallPlan,
        link: &ResponseLink,
        second: ConnectorCallSpec,
        handler: &dyn ResponseHandler,
    ) -> Result<FinalResponse, StageFailure> {
        self.execute_call(state, first).await?;
        link.apply(state);
        self.execute_call(state, &CallPlan::new(second)).await?;
        self.finish(state, handler)
    }
}
