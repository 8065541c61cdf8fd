use crate::client::WebhookClient;
use hookchat_core::{validate_message, ExchangeResult, HookchatResult};
use hookchat_session::SessionContext;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Runs chat turns: user message in, assistant reply appended.
pub struct ChatRunner {
    client: WebhookClient,
}

impl ChatRunner {
    pub fn new(client: WebhookClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &WebhookClient {
        &self.client
    }

    /// Runs one turn for `session`.
    ///
    /// Invalid input is rejected before anything is appended or sent. On
    /// success both the user message and the reply (or apology) are in the
    /// log, and the session is no longer busy.
    pub async fn run(
        &self,
        session: &mut SessionContext,
        input: &str,
        cancel: &CancellationToken,
    ) -> HookchatResult<ExchangeResult> {
        let message = validate_message(input)?;
        session.begin_turn()?;
        session.push_user(message);

        let session_id = session.session_id().to_string();
        let result = self
            .client
            .exchange_with_cancel(message, &session_id, cancel)
            .await;

        session.push_assistant(result.content.clone());
        session.end_turn();

        info!(
            session_id = %session_id,
            transport_ok = result.transport_ok,
            content_usable = result.content_usable,
            attempt = result.attempt,
            messages = session.message_count(),
            "Turn complete"
        );
        Ok(result)
    }
}
