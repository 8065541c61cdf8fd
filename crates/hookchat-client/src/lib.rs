//! Message exchange client for webhook-backed chat.
//!
//! Sends one user message plus a session id to a remote webhook, retries
//! transient failures, and turns whatever the webhook answers with (JSON
//! array, JSON object, HTML with an embedded `srcdoc`, or plain text) into a
//! string that can be shown as the assistant reply.
//!
//! # Main types
//!
//! - [`WebhookClient`] - Performs exchanges with bounded, cancellable retry.
//! - [`WebhookTransport`] - Seam for the HTTP call; [`HttpTransport`] is the reqwest implementation.
//! - [`ResponseBody`] - A webhook response classified by content type.
//! - [`ChatRunner`] - Runs validated user turns against a [`SessionContext`](hookchat_session::SessionContext).

pub mod client;
pub mod config;
pub mod payload;
pub mod response;
pub mod retry;
pub mod transport;
pub mod runner;

pub use client::WebhookClient;
pub use config::WebhookConfig;
pub use payload::WebhookPayload;
pub use response::{Extraction, ResponseBody};
pub use retry::{classify, tokio_sleep, RetryPolicy, SleepFn};
pub use transport::{HttpTransport, WebhookResponse, WebhookTransport};
pub use runner::ChatRunner;
