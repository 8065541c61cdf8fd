use hookchat_core::{ErrorKind, HookchatError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

/// Delay primitive used between attempts.
///
/// Injectable so tests can skip real waits. The client races every delay
/// against its cancellation token, so an implementation only has to complete
/// after the given duration.
pub type SleepFn =
    Arc<dyn Fn(Duration) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Sleeps on the tokio timer.
pub fn tokio_sleep() -> SleepFn {
    Arc::new(|d| Box::pin(tokio::time::sleep(d)))
}

/// Fixed-delay retry for webhook exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds.
    pub delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 1000,
        }
    }
}

impl RetryPolicy {
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Maps an error onto the failure classes of an exchange.
///
/// Timeouts and HTTP failures (connection, DNS, non-2xx status) are transient;
/// everything else is internal and must not be retried.
pub fn classify(err: &HookchatError) -> ErrorKind {
    match err {
        HookchatError::Timeout(_) => ErrorKind::Timeout,
        HookchatError::Http(_) => ErrorKind::Transport,
        HookchatError::Cancelled => ErrorKind::Cancelled,
        _ => ErrorKind::Internal,
    }
}
