//! The standalone send-event operation.
//!
//! Notification-style endpoints do not call a connector at all: they read
//! the event name and the affected-identifier list out of the request and
//! hand them to the realtime-event channel. The transport answer is always
//! a status envelope; a notify fault never propagates.

use crate::domain::envelope::FinalResponse;
use crate::domain::params::ParameterBag;
use crate::domain::ports::EventNotifier;
use crate::domain::request::InboundRequest;
use tracing::{info, warn};

/// Source tag attached to every realtime event this service emits.
pub const EVENT_SOURCE: &str = "connector-hub";

const EVENT_NAME_PARAM: &str = "eventName";
const ACCOUNTS_PARAM: &str = "accounts";

/// Sends one realtime event described by the request parameters.
///
/// `eventName` and `accounts` (a JSON array of affected identifiers) must
/// both be present; otherwise the notifier is never invoked and the
/// envelope reports what was missing.
pub async fn send_event(
    notifier: &dyn EventNotifier,
    request: &InboundRequest,
) -> FinalResponse {
    let params = ParameterBag::from_request(request);
    let event_name = params.get(EVENT_NAME_PARAM).unwrap_or("");
    let accounts_raw = params.get(ACCOUNTS_PARAM).unwrap_or("");

    let affected = if event_name.is_empty() || accounts_raw.is_empty() {
        None
    } else {
        serde_json::from_str::<Vec<String>>(accounts_raw).ok()
    };

    let Some(affected) = affected else {
        let message = format!(
            "Something is missing when sending event for event name: {event_name}, affected items: {accounts_raw}"
        );
        warn!(event = %event_name, "{message}");
        return FinalResponse::failure(message);
    };

    match notifier
        .notify(EVENT_SOURCE, event_name, &affected, request)
        .await
    {
        Ok(()) => {
            let message = format!(
                "Realtime event sent successfully for {event_name}, affected items {}",
                affected.join(",")
            );
            info!(event = %event_name, "{message}");
            FinalResponse::status(true, message)
        }
        Err(fault) => {
            let message = format!(
                "Realtime event was unsuccessful for {event_name}, affected items {}: {fault}",
                affected.join(",")
            );
            warn!(event = %event_name, %fault, "realtime event delivery failed");
            FinalResponse::failure(message)
        }
    }
}
