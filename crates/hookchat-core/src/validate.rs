use crate::{HookchatError, HookchatResult};

/// Longest accepted message, counted in characters after trimming.
pub const MAX_MESSAGE_CHARS: usize = 5000;

/// Checks a message before it is sent to the webhook.
///
/// Rejects empty or whitespace-only input and input longer than
/// [`MAX_MESSAGE_CHARS`] characters once trimmed. The untrimmed input is
/// returned unchanged on success.
pub fn validate_message(input: &str) -> HookchatResult<&str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(HookchatError::Validation("Message is empty".to_string()));
    }
    let len = trimmed.chars().count();
    if len > MAX_MESSAGE_CHARS {
        return Err(HookchatError::Validation(format!(
            "Message is {len} characters, limit is {MAX_MESSAGE_CHARS}"
        )));
    }
    Ok(input)
}
