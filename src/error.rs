use thiserror::Error;

pub type Result<T, E = WorkflowError> = std::result::Result<T, E>;

/// Failure reported by the external connector transport.
///
/// Connector faults are always surfaced as typed results, never panics, and
/// they are fatal to the call chain that dispatched them.
#[derive(Error, Debug)]
pub enum ConnectorFault {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("connector did not respond in time")]
    Timeout,
    #[error("connector reported an error: {0}")]
    Remote(String),
    #[error("unknown operation '{operation}'")]
    UnknownOperation { operation: String },
}

/// Failure reported by the realtime-event channel.
///
/// Notify faults are logged and swallowed; they never fail a pipeline.
#[derive(Error, Debug)]
pub enum NotifyFault {
    #[error("event channel unavailable: {0}")]
    Channel(String),
    #[error("event rejected: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("connector call failed: {0}")]
    ConnectorCall(#[from] ConnectorFault),
    #[error("branch {branch} failed: {source}")]
    Aggregation {
        branch: usize,
        #[source]
        source: Box<WorkflowError>,
    },
    /// A JSON-encoded filter value that did not parse. Recovered where
    /// detected: the offending field is dropped and the pipeline continues.
    #[error("malformed filter '{name}': {detail}")]
    MalformedFilter { name: String, detail: String },
    /// A dependent-call identifier lookup that missed. Recovered where
    /// detected: an empty identifier is substituted.
    #[error("dependent extraction failed: {detail}")]
    DependentExtraction { detail: String },
    #[error("response post-processing failed: {0}")]
    PostProcess(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The fixed stages a call chain runs through, in execution order.
///
/// Stage names appear verbatim in failure envelopes, so the variants map to
/// the wire vocabulary rather than to internal function names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Project,
    Dispatch,
    Await,
    Link,
    Aggregate,
    PostProcess,
    Complete,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::Project => "project",
            Stage::Dispatch => "dispatch",
            Stage::Await => "await",
            Stage::Link => "link",
            Stage::Aggregate => "aggregate",
            Stage::PostProcess => "post-process",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// A pipeline failure tagged with the stage that raised it.
///
/// This is what the error boundary converts into the outbound failure
/// envelope; the `Display` form is the envelope's message text.
#[derive(Error, Debug)]
#[error("{stage} : {source}")]
pub struct StageFailure {
    pub stage: Stage,
    #[source]
    pub source: WorkflowError,
}

impl StageFailure {
    pub fn new(stage: Stage, source: impl Into<WorkflowError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
