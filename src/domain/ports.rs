use crate::domain::call::{ConnectorCallSpec, ConnectorResponse};
use crate::domain::params::ParameterBag;
use crate::domain::request::InboundRequest;
use crate::error::{ConnectorFault, NotifyFault};
use async_trait::async_trait;
use std::sync::Arc;

/// The external call provider.
///
/// Implementations own transport, retry and SLA concerns; the engine only
/// sees a typed result. No per-call timeout is imposed here: a call that
/// never resolves suspends its chain.
#[async_trait]
pub trait ConnectorClient: Send + Sync {
    async fn call(
        &self,
        spec: ConnectorCallSpec,
        params: ParameterBag,
    ) -> Result<ConnectorResponse, ConnectorFault>;
}

/// The realtime-notification channel, fired best-effort on selected
/// outcomes. Callers log and swallow faults.
#[async_trait]
pub trait EventNotifier: Send + Sync {
    async fn notify(
        &self,
        source: &str,
        event: &str,
        affected: &[String],
        request: &InboundRequest,
    ) -> Result<(), NotifyFault>;
}

/// Shared across concurrent branches of a fan-out, hence `Arc` rather than
/// `Box`.
pub type ConnectorClientRef = Arc<dyn ConnectorClient>;

pub type EventNotifierRef = Arc<dyn EventNotifier>;
