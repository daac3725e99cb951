//! Classification of raw updates into typed inbound events.
//!
//! The "which optional field is set" inspection of a Telegram update
//! happens exactly once, here. Everything downstream consumes the tagged
//! [`InboundKind`] and never looks at wire structs again.

use crate::types::Update;

/// A single classified inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    /// Stable identity of the person acting. Always the sender id,
    /// never the chat id.
    pub sender_id: i64,
    /// Chat replies should go to.
    pub chat_id: i64,
    pub kind: InboundKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundKind {
    /// A `/command`, with the slash and any `@botname` suffix stripped.
    Command(String),
    Text(String),
    Photo {
        /// File id of the largest available size.
        file_id: String,
        caption: Option<String>,
    },
    ContactShared {
        phone: String,
    },
    Callback {
        payload: String,
        query_id: String,
    },
}

/// Classify an update. Returns `None` for shapes this bot does not
/// consume (channel posts, stickers, edits and so on).
pub fn classify(update: Update) -> Option<InboundEvent> {
    if let Some(query) = update.callback_query {
        let payload = query.data?;
        let chat_id = query
            .message
            .as_ref()
            .map(|m| m.chat.id)
            // Private chats share the user's id; acceptable fallback for
            // callbacks whose origin message is gone.
            .unwrap_or(query.from.id);
        return Some(InboundEvent {
            sender_id: query.from.id,
            chat_id,
            kind: InboundKind::Callback {
                payload,
                query_id: query.id,
            },
        });
    }

    let message = update.message?;
    let sender_id = message.from.as_ref()?.id;
    let chat_id = message.chat.id;
    let photo_file_id = message.largest_photo().map(|size| size.file_id.clone());

    let kind = if let Some(contact) = message.contact {
        InboundKind::ContactShared {
            phone: contact.phone_number,
        }
    } else if let Some(file_id) = photo_file_id {
        InboundKind::Photo {
            file_id,
            caption: message.caption,
        }
    } else if let Some(text) = message.text {
        match parse_command(&text) {
            Some(name) => InboundKind::Command(name),
            None => InboundKind::Text(text),
        }
    } else {
        return None;
    };

    Some(InboundEvent {
        sender_id,
        chat_id,
        kind,
    })
}

/// Extract a command name from `/name[@bot] [args]` shaped text.
fn parse_command(text: &str) -> Option<String> {
    let stripped = text.strip_prefix('/')?;
    let token = stripped.split_whitespace().next()?;
    let name = match token.split_once('@') {
        Some((name, _bot)) => name,
        None => token,
    };
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
