mod config;
mod repl;

use clap::{Parser, Subcommand};
use hookchat_client::{ChatRunner, WebhookClient};
use hookchat_session::{generate_session_id, SessionContext};
use std::path::PathBuf;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "hookchat.toml";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Parser)]
#[command(name = "hookchat", about = "Hookchat: chat with a webhook-backed assistant")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Webhook URL (overrides config and N8N_WEBHOOK_URL)
    #[arg(long)]
    webhook_url: Option<String>,

    /// Per-attempt timeout in seconds (overrides config)
    #[arg(long)]
    timeout: Option<u64>,

    /// Total attempts per message (overrides config)
    #[arg(long)]
    attempts: Option<u32>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive chat (default)
    Chat,
    /// Send a single message and print the reply
    Send {
        /// Message text
        message: String,
        /// Reuse an existing session id
        #[arg(long)]
        session_id: Option<String>,
        /// Print the full exchange result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check that the webhook answers
    Ping,
}

/// `RUST_LOG` when it parses, otherwise [`DEFAULT_LOG_FILTER`].
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    let required = cli.config.is_some();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = config::load_config(&config_path, required, |key| std::env::var(key).ok())?;

    if let Some(url) = cli.webhook_url {
        config.webhook.url = url;
    }
    if let Some(timeout) = cli.timeout {
        config.webhook.timeout_secs = timeout;
    }
    if let Some(attempts) = cli.attempts {
        config.webhook.max_attempts = attempts;
    }

    let client = WebhookClient::new(&config.webhook)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let runner = ChatRunner::new(client);
            let mut session = SessionContext::new(config.chat.welcome_message.clone());
            info!(session_id = %session.session_id(), "Starting interactive chat");

            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run_repl(
                &runner,
                &mut session,
                &config.chat.input_prompt,
                stdin,
                &mut stdout,
                repl::ctrl_c_events(),
            )
            .await?;
        }
        Commands::Send {
            message,
            session_id,
            json,
        } => {
            hookchat_core::validate_message(&message)?;
            let session_id = session_id.unwrap_or_else(generate_session_id);

            let cancel = CancellationToken::new();
            let guard = cancel.clone();
            let watcher = tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    guard.cancel();
                }
            });
            let result = client
                .exchange_with_cancel(&message, &session_id, &cancel)
                .await;
            watcher.abort();

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!("{}", result.content);
            }
            if !result.success() {
                std::process::exit(1);
            }
        }
        Commands::Ping => {
            let result = client.ping(&generate_session_id()).await;
            if result.success() {
                println!("Connected to {} (attempt {})", config.webhook.url, result.attempt);
            } else {
                println!("Failed to reach {}: {}", config.webhook.url, result.content);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
