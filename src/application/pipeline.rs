//! The pipeline executor.
//!
//! Every endpoint runs the same fixed stage order over one
//! [`WorkflowState`]: Init, Project, Dispatch, Await, PostProcess,
//! Complete. A failure from Dispatch onward short-circuits the remaining
//! stages and falls through to the error boundary, which converts it into
//! the structured failure envelope. A chain therefore resolves exactly
//! once, success or failure, and no fault escapes unconverted.

use crate::application::events::EVENT_SOURCE;
use crate::application::handler::ResponseHandler;
use crate::application::projection::Projection;
use crate::domain::call::ConnectorCallSpec;
use crate::domain::envelope::FinalResponse;
use crate::domain::ports::{ConnectorClientRef, EventNotifierRef};
use crate::domain::request::InboundRequest;
use crate::domain::state::WorkflowState;
use crate::error::{Stage, StageFailure};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// One planned connector call: the operation to invoke plus the projection
/// shaping its parameter set. Projections default to identity.
#[derive(Debug, Clone)]
pub struct CallPlan {
    pub spec: ConnectorCallSpec,
    pub projection: Projection,
}

impl CallPlan {
    pub fn new(spec: ConnectorCallSpec) -> Self {
        Self {
            spec,
            projection: Projection::identity(),
        }
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }
}

/// Drives call chains against the external connector provider.
///
/// Owns the collaborator handles and nothing else; each run builds a fresh
/// [`WorkflowState`] that is exclusively owned by that chain.
pub struct Pipeline {
    client: ConnectorClientRef,
    notifier: Option<EventNotifierRef>,
}

impl Pipeline {
    pub fn new(client: ConnectorClientRef) -> Self {
        Self {
            client,
            notifier: None,
        }
    }

    pub fn with_notifier(mut self, notifier: EventNotifierRef) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Runs the standard single-call chain and always resolves to an
    /// envelope.
    pub async fn run(
        &self,
        request: InboundRequest,
        plan: CallPlan,
        handler: &dyn ResponseHandler,
    ) -> FinalResponse {
        let mut state = WorkflowState::new(request);
        let outcome = match self.execute_call(&mut state, &plan).await {
            Ok(()) => self.finish(&mut state, handler),
            Err(failure) => Err(failure),
        };
        self.resolve(outcome)
    }

    /// Project, Dispatch and Await for one plan against the shared state.
    ///
    /// Dispatch obtains the pending call without awaiting it; Await is the
    /// chain's suspension point. On success the response is appended to the
    /// state, keeping the response count equal to the number of dispatched
    /// calls.
    pub(crate) async fn execute_call(
        &self,
        state: &mut WorkflowState,
        plan: &CallPlan,
    ) -> Result<(), StageFailure> {
        let projected = plan.projection.apply(state.params());
        state.set_params(projected);
        debug!(
            stage = %Stage::Project,
            operation = %plan.spec.operation,
            params = state.params().len(),
            "parameters projected"
        );

        let pending = self.client.call(plan.spec.clone(), state.params().clone());
        debug!(stage = %Stage::Dispatch, operation = %plan.spec.operation, "call dispatched");

        let response = pending
            .await
            .map_err(|fault| StageFailure::new(Stage::Await, fault))?;
        debug!(stage = %Stage::Await, operation = %plan.spec.operation, "response collected");
        state.push_response(response);
        Ok(())
    }

    /// Runs a plan in its own fresh state, as one branch of a fan-out.
    pub(crate) async fn branch_state(
        &self,
        request: InboundRequest,
        plan: CallPlan,
    ) -> Result<WorkflowState, StageFailure> {
        let mut state = WorkflowState::new(request);
        self.execute_call(&mut state, &plan).await?;
        Ok(state)
    }

    /// PostProcess and Complete over whatever the state has collected.
    pub(crate) fn finish(
        &self,
        state: &mut WorkflowState,
        handler: &dyn ResponseHandler,
    ) -> Result<FinalResponse, StageFailure> {
        let payload = handler
            .build(state)
            .map_err(|err| StageFailure::new(Stage::PostProcess, err))?;
        state.finish(payload.clone());
        self.fire_events(state, handler);
        Ok(FinalResponse::success(payload))
    }

    /// Fires the handler's event signal, if any, on a detached task.
    /// Best-effort: delivery faults are logged and swallowed, and the chain
    /// never waits for the notifier.
    fn fire_events(&self, state: &WorkflowState, handler: &dyn ResponseHandler) {
        let Some(notifier) = &self.notifier else {
            return;
        };
        let Some(signal) = handler.events(state) else {
            return;
        };
        let notifier = Arc::clone(notifier);
        let request = state.request().clone();
        tokio::spawn(async move {
            if let Err(fault) = notifier
                .notify(EVENT_SOURCE, &signal.event, &signal.affected, &request)
                .await
            {
                warn!(%fault, event = %signal.event, "realtime event delivery failed");
            }
        });
    }

    /// The error boundary. Every public run method terminates here, so the
    /// caller always receives exactly one envelope and no fault escapes
    /// unconverted.
    pub(crate) fn resolve(
        &self,
        outcome: Result<FinalResponse, StageFailure>,
    ) -> FinalResponse {
        match outcome {
            Ok(envelope) => envelope,
            Err(failure) => {
                error!(stage = %failure.stage, %failure, "call chain failed");
                FinalResponse::failure(failure.to_string())
            }
        }
    }
}
