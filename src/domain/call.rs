use serde::{Deserialize, Serialize};

/// Names one external operation: which connector, which version of it, and
/// which operation to invoke. Immutable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectorCallSpec {
    pub connector: String,
    pub version: String,
    pub operation: String,
}

impl ConnectorCallSpec {
    pub fn new(
        connector: impl Into<String>,
        version: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            connector: connector.into(),
            version: version.into(),
            operation: operation.into(),
        }
    }
}

/// The outcome of one dispatched-and-awaited connector call.
///
/// `body` is the raw payload as the connector produced it; parsing is left
/// to whichever stage needs structure out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorResponse {
    pub spec: ConnectorCallSpec,
    pub body: String,
    pub succeeded: bool,
}

impl ConnectorResponse {
    pub fn new(spec: ConnectorCallSpec, body: impl Into<String>) -> Self {
        Self {
            spec,
            body: body.into(),
            succeeded: true,
        }
    }
}
