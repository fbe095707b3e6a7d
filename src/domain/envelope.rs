use serde_json::{Value, json};

/// The outbound response envelope.
///
/// The transport-level answer is always this uniform shape; business
/// failure travels inside the JSON body rather than as a transport error.
/// The field names `response`, `success` and `message` are part of the wire
/// contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalResponse {
    body: Value,
}

impl FinalResponse {
    /// Success envelope: `{"response": <payload>}`.
    pub fn success(payload: Value) -> Self {
        Self {
            body: json!({ "response": payload }),
        }
    }

    /// Status envelope: `{"response": {"success": …, "message": …}}`,
    /// used by notification-style endpoints for both outcomes.
    pub fn status(success: bool, message: impl Into<String>) -> Self {
        Self {
            body: json!({
                "response": {
                    "success": success,
                    "message": message.into(),
                }
            }),
        }
    }

    /// Business-failure envelope: `{"response": {"success": false,
    /// "message": <text>}}`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::status(false, message)
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Whether this envelope carries an explicit `success: false` marker.
    pub fn is_failure(&self) -> bool {
        self.body
            .pointer("/response/success")
            .and_then(Value::as_bool)
            .is_some_and(|success| !success)
    }

    /// The envelope's in-body message, when one is present.
    pub fn message(&self) -> Option<&str> {
        self.body.pointer("/response/message").and_then(Value::as_str)
    }
}

impl std::fmt::Display for FinalResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // serde_json renders object keys in sorted order, so identical
        // payloads serialize to identical bytes.
        f.write_str(&self.body.to_string())
    }
}
