use crate::domain::params::ParameterBag;
use crate::error::WorkflowError;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone)]
enum ProjectionStep {
    /// Forward listed names when present and non-empty.
    Copy(Vec<String>),
    /// Forward listed names, substituting the empty string when absent.
    CopyAlways(Vec<String>),
    /// Forward one value under a different name.
    Rename { from: String, to: String },
    /// Parse the named value as a JSON object and forward each entry.
    ExpandJson(String),
}

/// A pure bag→bag transform applied before dispatch.
///
/// Built from combinators so each endpoint's parameter shape stays
/// configuration data. An empty projection forwards the merged bag
/// unchanged. Projections never fail: a malformed nested value is logged
/// and dropped, and the remaining entries still go out.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    steps: Vec<ProjectionStep>,
}

impl Projection {
    /// The identity projection: the merged bag is dispatched as-is.
    pub fn identity() -> Self {
        Self::default()
    }

    pub fn copy<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps
            .push(ProjectionStep::Copy(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn copy_always<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.steps.push(ProjectionStep::CopyAlways(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    pub fn rename(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.steps.push(ProjectionStep::Rename {
            from: from.into(),
            to: to.into(),
        });
        self
    }

    pub fn expand_json(mut self, name: impl Into<String>) -> Self {
        self.steps.push(ProjectionStep::ExpandJson(name.into()));
        self
    }

    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn apply(&self, source: &ParameterBag) -> ParameterBag {
        if self.is_identity() {
            return source.clone();
        }

        let mut out = ParameterBag::new();
        for step in &self.steps {
            match step {
                ProjectionStep::Copy(names) => {
                    for name in names {
                        if let Some(value) = source.get(name)
                            && !value.is_empty()
                        {
                            out.insert(name, value);
                        }
                    }
                }
                ProjectionStep::CopyAlways(names) => {
                    for name in names {
                        out.insert(name, source.get(name).unwrap_or(""));
                    }
                }
                ProjectionStep::Rename { from, to } => {
                    if let Some(value) = source.get(from)
                        && !value.is_empty()
                    {
                        out.insert(to, value);
                    }
                }
                ProjectionStep::ExpandJson(name) => {
                    if let Some(raw) = source.get(name)
                        && !raw.is_empty()
                    {
                        expand_json_value(name, raw, &mut out);
                    }
                }
            }
        }
        out
    }
}

/// Expands a JSON-encoded object value into individual bag entries.
/// A value that does not parse as an object is dropped, not fatal.
fn expand_json_value(name: &str, raw: &str, out: &mut ParameterBag) {
    match serde_json::from_str::<BTreeMap<String, Value>>(raw) {
        Ok(entries) => {
            for (key, value) in entries {
                let value = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                out.insert(key, value);
            }
        }
        Err(err) => {
            let dropped = WorkflowError::MalformedFilter {
                name: name.to_string(),
                detail: err.to_string(),
            };
            warn!(%dropped, "dropping unparsable filter field");
        }
    }
}
