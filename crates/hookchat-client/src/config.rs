use crate::retry::RetryPolicy;
use hookchat_core::{HookchatError, HookchatResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Endpoint used when neither the config file nor the environment names one.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://primary-production-6654.up.railway.app/webhook/f1deda52-3942-419c-879b-5b8b0f28743e";

/// Environment variable that overrides [`WebhookConfig::url`].
pub const WEBHOOK_URL_ENV: &str = "N8N_WEBHOOK_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookConfig {
    #[serde(default = "default_url")]
    pub url: String,
    /// Per-attempt request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per exchange, the first one included.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Fixed pause between attempts.
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

fn default_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

impl WebhookConfig {
    /// Applies [`WEBHOOK_URL_ENV`] from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Applies environment overrides using `lookup` to read variables.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.url = url.trim().to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            delay_ms: self.retry_delay_ms,
        }
    }

    pub fn validate(&self) -> HookchatResult<()> {
        if self.url.trim().is_empty() {
            return Err(HookchatError::Config("webhook url is empty".into()));
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(HookchatError::Config(format!(
                "webhook url must be http or https: {}",
                self.url
            )));
        }
        if self.max_attempts == 0 {
            return Err(HookchatError::Config("max_attempts must be at least 1".into()));
        }
        if self.timeout_secs == 0 {
            return Err(HookchatError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}
