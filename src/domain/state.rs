use crate::domain::call::ConnectorResponse;
use crate::domain::params::ParameterBag;
use crate::domain::request::InboundRequest;
use serde_json::Value;

/// Per-request accumulator threaded through the stages of one call chain.
///
/// Owns the inbound request (read-only), the current parameter bag, the
/// ordered sequence of collected connector responses, and the final
/// response payload. A state is exclusively owned by one in-flight chain
/// and is discarded once the response has been returned.
#[derive(Debug, Clone)]
pub struct WorkflowState {
    request: InboundRequest,
    params: ParameterBag,
    responses: Vec<ConnectorResponse>,
    final_payload: Option<Value>,
}

impl WorkflowState {
    /// Creates the state for one inbound request, seeding the parameter bag
    /// with the request's merged sources.
    pub fn new(request: InboundRequest) -> Self {
        let params = ParameterBag::from_request(&request);
        Self {
            request,
            params,
            responses: Vec::new(),
            final_payload: None,
        }
    }

    pub fn request(&self) -> &InboundRequest {
        &self.request
    }

    pub fn params(&self) -> &ParameterBag {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut ParameterBag {
        &mut self.params
    }

    /// Replaces the bag with a stage-projected one.
    pub fn set_params(&mut self, params: ParameterBag) {
        self.params = params;
    }

    /// Appends one collected response. The sequence length always equals
    /// the number of calls dispatched and awaited for this state.
    pub fn push_response(&mut self, response: ConnectorResponse) {
        self.responses.push(response);
    }

    pub fn responses(&self) -> &[ConnectorResponse] {
        &self.responses
    }

    pub fn into_responses(self) -> Vec<ConnectorResponse> {
        self.responses
    }

    /// Writes the final response payload. The first write sticks; the
    /// payload is immutable afterwards.
    pub fn finish(&mut self, payload: Value) {
        if self.final_payload.is_none() {
            self.final_payload = Some(payload);
        }
    }

    pub fn final_payload(&self) -> Option<&Value> {
        self.final_payload.as_ref()
    }
}
