use serde::{Deserialize, Serialize};

/// Why an exchange failed to produce a webhook reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Every attempt timed out.
    Timeout,
    /// Every attempt failed to connect or got a non-2xx status.
    Transport,
    /// Something unexpected went wrong; never retried.
    Internal,
    /// The caller cancelled the exchange.
    Cancelled,
}

impl ErrorKind {
    /// The user-facing text shown in place of a reply.
    pub fn apology(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "Sorry, the request timed out. Please try again.",
            ErrorKind::Transport => {
                "Sorry, I'm having trouble connecting right now. Please try again later."
            }
            ErrorKind::Internal => "An unexpected error occurred. Please try again.",
            ErrorKind::Cancelled => "The request was cancelled.",
        }
    }

    /// Whether another attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Timeout | ErrorKind::Transport)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::Transport => "transport",
            ErrorKind::Internal => "internal",
            ErrorKind::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// Outcome of one exchange with the webhook.
///
/// `content` is always non-empty and safe to display. `transport_ok` says the
/// webhook answered with a 2xx status; `content_usable` says a real reply
/// was extracted rather than a fallback string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeResult {
    /// The webhook answered with a 2xx status.
    pub transport_ok: bool,
    /// `content` came from the webhook rather than a fallback string.
    pub content_usable: bool,
    /// Text to display as the assistant reply.
    pub content: String,
    /// The raw response body, when one was received.
    pub raw_response: Option<String>,
    /// The declared `Content-Type` of the response, lower-cased.
    pub content_type: Option<String>,
    /// Failure classification, `None` when the transport succeeded.
    pub error_kind: Option<ErrorKind>,
    /// Raw error detail for logs. Never shown to the user, so it is left
    /// out of serialized output.
    #[serde(skip_serializing, default)]
    pub error_detail: Option<String>,
    /// 1-based number of the attempt that produced this result.
    pub attempt: u32,
}

impl ExchangeResult {
    /// A result for a response the webhook delivered.
    pub fn delivered(
        content: impl Into<String>,
        content_usable: bool,
        raw_response: Option<String>,
        content_type: Option<String>,
        attempt: u32,
    ) -> Self {
        Self {
            transport_ok: true,
            content_usable,
            content: content.into(),
            raw_response,
            content_type,
            error_kind: None,
            error_detail: None,
            attempt,
        }
    }

    /// A failed result carrying the apology text for `kind`.
    pub fn failed(kind: ErrorKind, detail: impl Into<String>, attempt: u32) -> Self {
        Self {
            transport_ok: false,
            content_usable: false,
            content: kind.apology().to_string(),
            raw_response: None,
            content_type: None,
            error_kind: Some(kind),
            error_detail: Some(detail.into()),
            attempt,
        }
    }

    /// Alias for `transport_ok`, matching the webhook's notion of success.
    pub fn success(&self) -> bool {
        self.transport_ok
    }
}
