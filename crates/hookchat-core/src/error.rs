use thiserror::Error;

/// A convenience `Result` alias using [`HookchatError`].
pub type HookchatResult<T> = Result<T, HookchatError>;

/// Top-level error type for Hookchat.
///
/// Each variant corresponds to a subsystem that can produce errors. The
/// webhook client maps these onto an [`ErrorKind`](crate::ErrorKind) before
/// anything reaches the user.
#[derive(Error, Debug)]
pub enum HookchatError {
    /// The webhook did not answer within the configured timeout.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A connection, DNS, or non-2xx status failure talking to the webhook.
    #[error("HTTP error: {0}")]
    Http(String),

    /// User input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An error related to session state (e.g. a turn already in flight).
    #[error("Session error: {0}")]
    Session(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// The caller cancelled the operation.
    #[error("Operation cancelled")]
    Cancelled,

    /// A failure that is neither transport nor content related.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
