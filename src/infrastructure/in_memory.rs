use crate::domain::call::{ConnectorCallSpec, ConnectorResponse};
use crate::domain::params::ParameterBag;
use crate::domain::ports::{ConnectorClient, EventNotifier};
use crate::domain::request::InboundRequest;
use crate::error::{ConnectorFault, NotifyFault};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone)]
enum CannedOutcome {
    Body(String),
    Fault(String),
}

/// A connector client with canned outcomes, keyed by operation name.
///
/// Records every dispatched call (spec plus parameter bag) for later
/// inspection. Operations without a canned outcome fail with
/// `ConnectorFault::UnknownOperation`, so a miss in a fixture set surfaces
/// as a regular connector fault rather than a panic.
#[derive(Default, Clone)]
pub struct StaticConnectorClient {
    outcomes: HashMap<String, CannedOutcome>,
    calls: Arc<RwLock<Vec<(ConnectorCallSpec, ParameterBag)>>>,
}

impl StaticConnectorClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(mut self, operation: impl Into<String>, body: impl Into<String>) -> Self {
        self.outcomes
            .insert(operation.into(), CannedOutcome::Body(body.into()));
        self
    }

    pub fn with_fault(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.outcomes
            .insert(operation.into(), CannedOutcome::Fault(detail.into()));
        self
    }

    /// The calls dispatched so far, in dispatch order.
    pub async fn calls(&self) -> Vec<(ConnectorCallSpec, ParameterBag)> {
        self.calls.read().await.clone()
    }
}

#[async_trait]
impl ConnectorClient for StaticConnectorClient {
    async fn call(
        &self,
        spec: ConnectorCallSpec,
        params: ParameterBag,
    ) -> Result<ConnectorResponse, ConnectorFault> {
        self.calls.write().await.push((spec.clone(), params));

        match self.outcomes.get(&spec.operation) {
            Some(CannedOutcome::Body(body)) => Ok(ConnectorResponse::new(spec, body.clone())),
            Some(CannedOutcome::Fault(detail)) => Err(ConnectorFault::Transport(detail.clone())),
            None => Err(ConnectorFault::UnknownOperation {
                operation: spec.operation,
            }),
        }
    }
}

/// One notification as the notifier received it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub source: String,
    pub event: String,
    pub affected: Vec<String>,
}

/// An event notifier that records every notification it receives.
///
/// The `rejecting` variant still records the attempt but fails it, for
/// exercising the swallow path.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    events: Arc<RwLock<Vec<RecordedEvent>>>,
    reject: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub async fn events(&self) -> Vec<RecordedEvent> {
        self.events.read().await.clone()
    }
}

#[async_trait]
impl EventNotifier for RecordingNotifier {
    async fn notify(
        &self,
        source: &str,
        event: &str,
        affected: &[String],
        _request: &InboundRequest,
    ) -> Result<(), NotifyFault> {
        self.events.write().await.push(RecordedEvent {
            source: source.to_string(),
            event: event.to_string(),
            affected: affected.to_vec(),
        });

        if self.reject {
            Err(NotifyFault::Rejected("injected rejection".to_string()))
        } else {
            Ok(())
        }
    }
}

/// A notifier that only logs the event. Stands in for the realtime channel
/// when the binary runs against fixtures.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventNotifier for LogNotifier {
    async fn notify(
        &self,
        source: &str,
        event: &str,
        affected: &[String],
        _request: &InboundRequest,
    ) -> Result<(), NotifyFault> {
        info!(source, event, affected = affected.len(), "realtime event emitted");
        Ok(())
    }
}
