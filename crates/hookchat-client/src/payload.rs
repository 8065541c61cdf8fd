use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// JSON body POSTed to the webhook.
///
/// Serializes as `{"message": ..., "timestamp": <RFC 3339>, "sessionId": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub session_id: String,
}

impl WebhookPayload {
    /// Builds a payload stamped with the current time.
    pub fn new(message: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            session_id: session_id.into(),
        }
    }
}
