//! Fan-out of independent call chains and the all-of join.

use crate::application::handler::ResponseHandler;
use crate::application::pipeline::{CallPlan, Pipeline};
use crate::domain::envelope::FinalResponse;
use crate::domain::request::InboundRequest;
use crate::domain::state::WorkflowState;
use crate::error::{Result, Stage, StageFailure, WorkflowError};
use futures::future::join_all;
use std::future::Future;
use tracing::debug;

/// Joins independent branch futures into one merged state.
///
/// All-of semantics: every branch is awaited to completion, and the first
/// failed branch (in submission order) fails the whole aggregate with no
/// partial merge. On full success the merge seeds a fresh state from the
/// original request — never from a branch — and appends each branch's
/// responses in submission order, preserving intra-branch order. The result
/// is a deterministic concatenation independent of completion order.
pub async fn aggregate<F>(
    request: &InboundRequest,
    branches: Vec<F>,
) -> Result<WorkflowState>
where
    F: Future<Output = Result<WorkflowState>>,
{
    debug!(branches = branches.len(), "fanning out call chains");
    let results = join_all(branches).await;

    let mut merged = WorkflowState::new(request.clone());
    for (branch, result) in results.into_iter().enumerate() {
        let state = result.map_err(|source| WorkflowError::Aggregation {
            branch,
            source: Box::new(source),
        })?;
        for response in state.into_responses() {
            merged.push_response(response);
        }
    }
    Ok(merged)
}

impl Pipeline {
    /// Runs one call chain per plan concurrently, joins them all-of, and
    /// post-processes the merged state. A single failing branch fails the
    /// whole request; succeeded branches are discarded, not merged.
    pub async fn run_fanout(
        &self,
        request: InboundRequest,
        plans: Vec<CallPlan>,
        handler: &dyn ResponseHandler,
    ) -> FinalResponse {
        let branches: Vec<_> = plans
            .into_iter()
            .map(|plan| {
                let branch_request = request.clone();
                async move {
                    self.branch_state(branch_request, plan)
                        .await
                        .map_err(|failure| failure.source)
                }
            })
            .collect();

        let outcome = match aggregate(&request, branches).await {
            Ok(mut merged) => self.finish(&mut merged, handler),
            Err(err) => Err(StageFailure::new(Stage::Aggregate, err)),
        };
        self.resolve(outcome)
    }
}
