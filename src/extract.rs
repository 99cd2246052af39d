//! Extraction of the assistant's reply from a thread listing.

use crate::api::messages::{Role, ThreadMessage};
use crate::error::{Error, Result};

/// Returns the text of the most recent assistant message.
///
/// `messages` must be ordered newest first, as the listing endpoint returns
/// them; the order is trusted, not verified. The first assistant message
/// carrying a `text` block wins. Assistant messages without text are skipped.
///
/// # Errors
///
/// - [`Error::EmptyThread`] if `messages` is empty.
/// - [`Error::MalformedMessage`] if assistant messages exist but none has
///   text; it names the first such message.
/// - [`Error::NoAssistantResponse`] if no message was written by the
///   assistant.
pub fn latest_assistant_response(messages: &[ThreadMessage]) -> Result<&str> {
    if messages.is_empty() {
        return Err(Error::EmptyThread);
    }

    let mut first_malformed: Option<&ThreadMessage> = None;
    for message in messages.iter().filter(|m| m.role == Role::Assistant) {
        match message.first_text() {
            Some(text) => return Ok(text),
            None => {
                first_malformed.get_or_insert(message);
            }
        }
    }

    match first_malformed {
        Some(message) => Err(Error::MalformedMessage {
            message_id: message.id.clone(),
        }),
        None => Err(Error::NoAssistantResponse),
    }
}
