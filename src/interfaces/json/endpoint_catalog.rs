//! Endpoint descriptions as external configuration.
//!
//! Which connector operation an endpoint invokes, which parameter names it
//! forwards, whether it expands a JSON filter value, chains a dependent
//! call or fans out over several operations — all of that varies per
//! deployment and lives in a JSON catalog rather than in code.

use crate::application::multi_call::ResponseLink;
use crate::application::pipeline::CallPlan;
use crate::application::projection::Projection;
use crate::domain::call::ConnectorCallSpec;
use crate::error::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;

/// Forward one parameter under a different name.
#[derive(Debug, Clone, Deserialize)]
pub struct RenameRule {
    pub from: String,
    pub to: String,
}

/// One connector call as catalog data.
#[derive(Debug, Clone, Deserialize)]
pub struct CallConfig {
    pub connector: String,
    pub version: String,
    pub operation: String,
    /// Parameter names forwarded to the connector. Empty means the merged
    /// bag goes out unchanged.
    #[serde(default)]
    pub params: Vec<String>,
    /// Forward listed names even when absent, substituting the empty
    /// string.
    #[serde(default)]
    pub copy_empty: bool,
    #[serde(default)]
    pub rename: Vec<RenameRule>,
    /// Expand the JSON-encoded `filters` value into individual parameters.
    #[serde(default)]
    pub expand_filters: bool,
}

impl CallConfig {
    pub fn spec(&self) -> ConnectorCallSpec {
        ConnectorCallSpec::new(&self.connector, &self.version, &self.operation)
    }

    pub fn projection(&self) -> Projection {
        let mut projection = Projection::identity();
        if !self.params.is_empty() {
            projection = if self.copy_empty {
                projection.copy_always(self.params.iter().cloned())
            } else {
                projection.copy(self.params.iter().cloned())
            };
        }
        for rule in &self.rename {
            projection = projection.rename(&rule.from, &rule.to);
        }
        if self.expand_filters {
            projection = projection.expand_json("filters");
        }
        projection
    }

    pub fn plan(&self) -> CallPlan {
        CallPlan::new(self.spec()).with_projection(self.projection())
    }
}

/// Where the dependent call finds its identifier.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkConfig {
    pub path: String,
    #[serde(default)]
    pub index: usize,
    pub field: String,
    pub param: String,
}

impl LinkConfig {
    pub fn link(&self) -> ResponseLink {
        ResponseLink::new(&self.path, self.index, &self.field, &self.param)
    }
}

/// The second call of a chained endpoint plus its link.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub connector: String,
    pub version: String,
    pub operation: String,
    pub link: LinkConfig,
}

impl ChainConfig {
    pub fn spec(&self) -> ConnectorCallSpec {
        ConnectorCallSpec::new(&self.connector, &self.version, &self.operation)
    }
}

/// One named endpoint of the service.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EndpointConfig {
    /// A connector-backed endpoint: one call, optionally chained with a
    /// dependent second call or fanned out over sibling operations.
    Workflow(WorkflowEndpoint),
    /// A notification-style endpoint that only emits a realtime event.
    Event,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowEndpoint {
    #[serde(flatten)]
    pub call: CallConfig,
    #[serde(default)]
    pub chain: Option<ChainConfig>,
    /// Additional operations run concurrently with the primary call; the
    /// results are merged in this listed order after the primary's.
    #[serde(default)]
    pub fan_out: Vec<CallConfig>,
}

impl WorkflowEndpoint {
    /// The primary plan followed by the fan-out plans, in merge order.
    pub fn branch_plans(&self) -> Vec<CallPlan> {
        let mut plans = vec![self.call.plan()];
        plans.extend(self.fan_out.iter().map(CallConfig::plan));
        plans
    }
}

/// The full endpoint catalog: endpoint name → configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointCatalog {
    #[serde(flatten)]
    endpoints: HashMap<String, EndpointConfig>,
}

impl EndpointCatalog {
    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        Ok(serde_json::from_reader(source)?)
    }

    pub fn get(&self, name: &str) -> Option<&EndpointConfig> {
        self.endpoints.get(name)
    }

    /// Endpoint names in sorted order, for error reporting.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.endpoints.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
