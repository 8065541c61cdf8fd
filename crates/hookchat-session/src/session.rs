use crate::stats::ChatStats;
use chrono::{DateTime, Utc};
use hookchat_core::{ConversationMessage, HookchatError, HookchatResult};
use tracing::debug;
use uuid::Uuid;

/// Welcome text used when the configuration does not supply one.
pub const DEFAULT_WELCOME: &str =
    "Hi there! Tell me what you are working on and I'll do my best to help.";

/// Generates an opaque session id of the form `session_<unix-secs>_<8 hex>`.
pub fn generate_session_id() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    format!("session_{}_{}", Utc::now().timestamp(), &uuid[..8])
}

/// State owned by one interactive chat session.
///
/// The log always starts with the assistant welcome message and is never
/// empty. Messages are only ever appended; [`clear`](Self::clear) and
/// [`new_session`](Self::new_session) reset it back to the welcome message.
#[derive(Debug, Clone)]
pub struct SessionContext {
    session_id: String,
    messages: Vec<ConversationMessage>,
    welcome: String,
    busy: bool,
    created_at: DateTime<Utc>,
}

impl SessionContext {
    /// Starts a session seeded with `welcome`.
    pub fn new(welcome: impl Into<String>) -> Self {
        let welcome = welcome.into();
        Self {
            session_id: generate_session_id(),
            messages: vec![ConversationMessage::assistant(welcome.clone())],
            welcome,
            busy: false,
            created_at: Utc::now(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The most recent message. The log is never empty.
    pub fn last(&self) -> &ConversationMessage {
        &self.messages[self.messages.len() - 1]
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn add_message(&mut self, message: ConversationMessage) -> &ConversationMessage {
        self.messages.push(message);
        self.last()
    }

    pub fn push_user(&mut self, content: impl Into<String>) -> &ConversationMessage {
        self.add_message(ConversationMessage::user(content))
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) -> &ConversationMessage {
        self.add_message(ConversationMessage::assistant(content))
    }

    /// Whether a turn is in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Marks a turn as started. Fails if one is already in flight.
    pub fn begin_turn(&mut self) -> HookchatResult<()> {
        if self.busy {
            return Err(HookchatError::Session(format!(
                "Session {} is busy with another message",
                self.session_id
            )));
        }
        self.busy = true;
        Ok(())
    }

    pub fn end_turn(&mut self) {
        self.busy = false;
    }

    /// Drops every message except a fresh welcome message.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.messages
            .push(ConversationMessage::assistant(self.welcome.clone()));
        debug!(session_id = %self.session_id, "Session history cleared");
    }

    /// Clears the history and assigns a new session id.
    pub fn new_session(&mut self) {
        let old = std::mem::replace(&mut self.session_id, generate_session_id());
        self.created_at = Utc::now();
        self.busy = false;
        self.clear();
        debug!(old = %old, new = %self.session_id, "New session started");
    }

    pub fn stats(&self) -> ChatStats {
        ChatStats::from_log(&self.messages)
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new(DEFAULT_WELCOME)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use hookchat_core::Role;

    #[test]
    fn test_session_id_format() {
        let id = generate_session_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "session");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 8);
        assert!(parts[2].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_new_session_is_seeded() {
        let session = SessionContext::new("Welcome!");
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.last().role(), Role::Assistant);
        assert_eq!(session.last().content(), "Welcome!");
        assert!(!session.is_busy());
    }

    #[test]
    fn test_busy_flag_guards_turns() {
        let mut session = SessionContext::default();
        session.begin_turn().unwrap();
        assert!(session.is_busy());
        assert!(matches!(
            session.begin_turn(),
            Err(HookchatError::Session(_))
        ));
        session.end_turn();
        assert!(session.begin_turn().is_ok());
    }

    #[test]
    fn test_stats() {
        let mut session = SessionContext::default();
        session.push_user("one");
        session.push_assistant("two");
        session.push_user("three");
        let stats = session.stats();
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.user_messages, 2);
        assert_eq!(stats.assistant_messages, 2);
        assert_eq!(stats.conversation_length, 3);
    }
}
