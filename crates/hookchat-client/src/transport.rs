use crate::config::WebhookConfig;
use crate::payload::WebhookPayload;
use async_trait::async_trait;
use hookchat_core::{HookchatError, HookchatResult};
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

/// Longest slice of an error body kept in error messages.
const ERROR_BODY_PREVIEW: usize = 200;

/// A 2xx answer from the webhook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: u16,
    /// Lower-cased `Content-Type` header, empty when absent.
    pub content_type: String,
    pub body: String,
}

/// Performs one POST to the webhook.
///
/// Implementations report a timeout as [`HookchatError::Timeout`], connection
/// problems and non-2xx statuses as [`HookchatError::Http`], and anything else
/// through the remaining variants. Retrying is the caller's job.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    async fn post(&self, payload: &WebhookPayload) -> HookchatResult<WebhookResponse>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    url: String,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(url: impl Into<String>, timeout: Duration) -> HookchatResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HookchatError::Config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            url: url.into(),
            http,
        })
    }

    pub fn from_config(config: &WebhookConfig) -> HookchatResult<Self> {
        Self::new(config.url.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

fn map_reqwest_error(e: reqwest::Error) -> HookchatError {
    if e.is_timeout() {
        HookchatError::Timeout(e.to_string())
    } else if e.is_builder() {
        HookchatError::Internal(format!("Failed to build webhook request: {e}"))
    } else {
        HookchatError::Http(e.to_string())
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post(&self, payload: &WebhookPayload) -> HookchatResult<WebhookResponse> {
        let resp = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .json(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = resp.status();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let body = resp.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            return Err(HookchatError::Http(format!(
                "Webhook returned {status}: {preview}"
            )));
        }

        debug!(
            status = status.as_u16(),
            content_type = %content_type,
            bytes = body.len(),
            "Webhook responded"
        );

        Ok(WebhookResponse {
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
