use serde::{Deserialize, Serialize};

/// A single name/value parameter as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The primary payload sub-document of an inbound request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadDocument {
    #[serde(default)]
    pub parameters: Vec<NameValue>,
}

/// The nested "method" bag inside the response-metadata document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDocument {
    #[serde(default)]
    pub parameters: Vec<NameValue>,
}

/// The optional secondary response-metadata sub-document: a flat parameter
/// bag plus a nested method bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub parameters: Vec<NameValue>,
    #[serde(default)]
    pub method: Option<MethodDocument>,
}

/// The inbound request envelope.
///
/// Carries a primary payload sub-document and an optional secondary
/// response-metadata sub-document. Immutable once received; call chains
/// only ever read it, and fan-out branches clone it to seed their own
/// workflow state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundRequest {
    #[serde(default)]
    pub payload: Option<PayloadDocument>,
    #[serde(default)]
    pub metadata: Option<ResponseMetadata>,
}

impl InboundRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a request whose primary payload holds the given pairs.
    pub fn with_payload(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            payload: Some(PayloadDocument {
                parameters: pairs
                    .into_iter()
                    .map(|(name, value)| NameValue::new(name, value))
                    .collect(),
            }),
            metadata: None,
        }
    }
}
