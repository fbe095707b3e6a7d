use crate::error::Result;
use crate::infrastructure::in_memory::StaticConnectorClient;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;

/// One canned outcome in a fixture file: either a JSON response body or a
/// `{"fault": "<detail>"}` marker.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FixtureOutcome {
    Fault { fault: String },
    Body(Value),
}

/// Loads a fixture file (operation name → canned outcome) into a
/// [`StaticConnectorClient`].
pub fn load_fixtures<R: Read>(source: R) -> Result<StaticConnectorClient> {
    let entries: HashMap<String, FixtureOutcome> = serde_json::from_reader(source)?;

    let mut client = StaticConnectorClient::new();
    for (operation, outcome) in entries {
        client = match outcome {
            FixtureOutcome::Fault { fault } => client.with_fault(operation, fault),
            FixtureOutcome::Body(body) => client.with_response(operation, body.to_string()),
        };
    }
    Ok(client)
}
