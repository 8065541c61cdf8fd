use crate::config::WebhookConfig;
use crate::payload::WebhookPayload;
use crate::response::ResponseBody;
use crate::retry::{classify, tokio_sleep, RetryPolicy, SleepFn};
use crate::transport::{HttpTransport, WebhookResponse, WebhookTransport};
use hookchat_core::{ErrorKind, ExchangeResult, HookchatResult};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Text sent by [`WebhookClient::ping`].
pub const PING_MESSAGE: &str = "Connection test";

/// Sends user messages to the webhook and turns the answer into display text.
///
/// Timeouts and transport failures are retried up to the policy's attempt
/// budget with a fixed delay. Every other failure returns at once. The
/// returned [`ExchangeResult`] always has non-empty `content`.
pub struct WebhookClient {
    transport: Arc<dyn WebhookTransport>,
    policy: RetryPolicy,
    sleep: SleepFn,
}

impl WebhookClient {
    /// Builds a client that talks HTTP to `config.url`.
    pub fn new(config: &WebhookConfig) -> HookchatResult<Self> {
        config.validate()?;
        let transport = HttpTransport::from_config(config)?;
        info!(url = %transport.url(), attempts = config.max_attempts, "Webhook client ready");
        Ok(Self::with_transport(Arc::new(transport), config.retry_policy()))
    }

    /// Builds a client over any transport.
    pub fn with_transport(transport: Arc<dyn WebhookTransport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            sleep: tokio_sleep(),
        }
    }

    /// Replaces the delay used between attempts.
    pub fn with_sleep(mut self, sleep: SleepFn) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Exchanges one message. Not cancellable; see
    /// [`exchange_with_cancel`](Self::exchange_with_cancel).
    pub async fn exchange(&self, message: &str, session_id: &str) -> ExchangeResult {
        self.exchange_with_cancel(message, session_id, &CancellationToken::new())
            .await
    }

    /// Exchanges one message, stopping as soon as `cancel` fires.
    ///
    /// Cancellation interrupts both an in-flight request and the pause
    /// between attempts.
    pub async fn exchange_with_cancel(
        &self,
        message: &str,
        session_id: &str,
        cancel: &CancellationToken,
    ) -> ExchangeResult {
        let payload = WebhookPayload::new(message, session_id);
        let max_attempts = self.policy.attempts();
        let mut last_failure: Option<(ErrorKind, String)> = None;

        for attempt in 1..=max_attempts {
            info!(
                session_id = %session_id,
                attempt,
                chars = message.chars().count(),
                "Sending message to webhook"
            );

            let outcome = tokio::select! {
                biased;
                _ = cancel.cancelled() => return cancelled(session_id, attempt),
                outcome = self.transport.post(&payload) => outcome,
            };

            let err = match outcome {
                Ok(response) => return finish(response, attempt),
                Err(e) => e,
            };

            let kind = classify(&err);
            if !kind.is_retryable() {
                error!(session_id = %session_id, attempt, kind = %kind, error = %err, "Exchange failed");
                return ExchangeResult::failed(kind, err.to_string(), attempt);
            }

            if attempt < max_attempts {
                let delay = self.policy.delay();
                warn!(
                    session_id = %session_id,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    kind = %kind,
                    error = %err,
                    "Retryable error, retrying"
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return cancelled(session_id, attempt),
                    _ = (self.sleep)(delay) => {}
                }
            }
            last_failure = Some((kind, err.to_string()));
        }

        let (kind, detail) = last_failure
            .unwrap_or_else(|| (ErrorKind::Internal, "no attempt was made".to_string()));
        error!(
            session_id = %session_id,
            attempts = max_attempts,
            kind = %kind,
            error = %detail,
            "Exchange failed after all attempts"
        );
        ExchangeResult::failed(kind, detail, max_attempts)
    }

    /// Sends a fixed probe message and reports whether the webhook answered.
    pub async fn ping(&self, session_id: &str) -> ExchangeResult {
        self.exchange(PING_MESSAGE, session_id).await
    }
}

fn finish(response: WebhookResponse, attempt: u32) -> ExchangeResult {
    let body = ResponseBody::classify(&response.content_type, &response.body);
    let extraction = body.extract();
    debug!(
        attempt,
        usable = extraction.usable,
        preview = %extraction.text.chars().take(100).collect::<String>(),
        "Extracted webhook reply"
    );
    let content_type = (!response.content_type.is_empty()).then_some(response.content_type);
    ExchangeResult::delivered(
        extraction.text,
        extraction.usable,
        Some(response.body),
        content_type,
        attempt,
    )
}

fn cancelled(session_id: &str, attempt: u32) -> ExchangeResult {
    info!(session_id = %session_id, attempt, "Exchange cancelled");
    ExchangeResult::failed(ErrorKind::Cancelled, "cancelled by caller", attempt)
}

// ─── Tests ───────────────────────────────────────────────────────────────────
