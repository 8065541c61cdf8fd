use hookchat_core::{ConversationMessage, Role};
use serde::Serialize;

/// Message counts for a conversation log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChatStats {
    /// Every message in the log, welcome included.
    pub total_messages: usize,
    /// Messages sent by the user.
    pub user_messages: usize,
    /// Replies, welcome included.
    pub assistant_messages: usize,
    /// Messages exchanged after the welcome message.
    pub conversation_length: usize,
}

impl ChatStats {
    /// Counts the messages in `log`.
    pub fn from_log(log: &[ConversationMessage]) -> Self {
        let user_messages = log.iter().filter(|m| m.role() == Role::User).count();
        let assistant_messages = log.len() - user_messages;
        Self {
            total_messages: log.len(),
            user_messages,
            assistant_messages,
            conversation_length: log.len().saturating_sub(1),
        }
    }
}
