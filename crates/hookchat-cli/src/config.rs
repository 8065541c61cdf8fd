//! `hookchat.toml` loading.
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! `N8N_WEBHOOK_URL`, then command-line flags (applied in `main.rs`).

use hookchat_client::WebhookConfig;
use hookchat_core::{HookchatError, HookchatResult};
use hookchat_session::DEFAULT_WELCOME;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookchatConfig {
    #[serde(default)]
    pub webhook: WebhookConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// First assistant message of every session.
    #[serde(default = "default_welcome")]
    pub welcome_message: String,
    /// Prompt printed before each line of input.
    #[serde(default = "default_prompt")]
    pub input_prompt: String,
}

fn default_welcome() -> String {
    DEFAULT_WELCOME.to_string()
}

fn default_prompt() -> String {
    "> ".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            welcome_message: default_welcome(),
            input_prompt: default_prompt(),
        }
    }
}

/// Parses a config file.
pub fn parse_config(path: &Path) -> HookchatResult<HookchatConfig> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| {
        HookchatError::Config(format!("Failed to parse '{}': {e}", path.display()))
    })
}

/// Loads the config file if it exists, then applies environment overrides.
///
/// A missing file is only an error when `required` is set, i.e. the user
/// passed `--config` explicitly.
pub fn load_config(
    path: &Path,
    required: bool,
    env: impl Fn(&str) -> Option<String>,
) -> HookchatResult<HookchatConfig> {
    let mut config = if path.exists() {
        info!(path = %path.display(), "Loading config");
        parse_config(path)?
    } else if required {
        return Err(HookchatError::Config(format!(
            "Config file '{}' not found",
            path.display()
        )));
    } else {
        HookchatConfig::default()
    };
    config.webhook.apply_env_with(env);
    Ok(config)
}
