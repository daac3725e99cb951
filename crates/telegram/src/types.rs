//! Telegram Bot API wire types.
//!
//! Only the subset of the Bot API this bot touches is modelled. Inbound
//! structs are `Deserialize` and tolerate missing optional fields;
//! outbound structs are `Serialize` and match the Bot API field names
//! exactly.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Inbound
// ---------------------------------------------------------------------------

/// One element of the `getUpdates` result array.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub callback_query: Option<CallbackQuery>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    /// Absent for channel posts; this bot ignores those.
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    /// Available sizes of a photo, smallest first.
    #[serde(default)]
    pub photo: Option<Vec<PhotoSize>>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
}

impl Message {
    /// The largest available size of an attached photo. The Bot API
    /// orders sizes ascending, so this is the last entry.
    pub fn largest_photo(&self) -> Option<&PhotoSize> {
        self.photo.as_ref()?.last()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub width: i64,
    pub height: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    /// Telegram id of the contact's owner, when the contact is a
    /// Telegram user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from: User,
    /// The message the pressed button was attached to. May be absent for
    /// very old messages.
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub data: Option<String>,
}

// ---------------------------------------------------------------------------
// Outbound
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardButton {
    pub text: String,
    pub callback_data: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InlineKeyboardMarkup {
    pub inline_keyboard: Vec<Vec<InlineKeyboardButton>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    pub request_contact: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardMarkup {
    pub keyboard: Vec<Vec<KeyboardButton>>,
    pub resize_keyboard: bool,
    pub one_time_keyboard: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplyKeyboardRemove {
    pub remove_keyboard: bool,
}

/// The `reply_markup` parameter of send methods. Serialized untagged:
/// each variant has distinct field names the Bot API dispatches on.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Inline(InlineKeyboardMarkup),
    Keyboard(ReplyKeyboardMarkup),
    Remove(ReplyKeyboardRemove),
}

impl ReplyMarkup {
    /// Inline keyboard from rows of `(label, callback_data)` pairs.
    pub fn inline(rows: Vec<Vec<(String, String)>>) -> Self {
        Self::Inline(InlineKeyboardMarkup {
            inline_keyboard: rows
                .into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|(text, callback_data)| InlineKeyboardButton {
                            text,
                            callback_data,
                        })
                        .collect()
                })
                .collect(),
        })
    }

    /// One-time reply keyboard with a single contact-request button.
    pub fn request_contact(label: impl Into<String>) -> Self {
        Self::Keyboard(ReplyKeyboardMarkup {
            keyboard: vec![vec![KeyboardButton {
                text: label.into(),
                request_contact: true,
            }]],
            resize_keyboard: true,
            one_time_keyboard: true,
        })
    }

    pub fn remove() -> Self {
        Self::Remove(ReplyKeyboardRemove {
            remove_keyboard: true,
        })
    }
}

/// One photo inside a `sendMediaGroup` payload.
#[derive(Debug, Clone, Serialize)]
pub struct InputMediaPhoto {
    pub r#type: &'static str,
    /// Telegram file id of a previously uploaded photo.
    pub media: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl InputMediaPhoto {
    pub fn new(file_id: impl Into<String>, caption: Option<String>) -> Self {
        Self {
            r#type: "photo",
            media: file_id.into(),
            caption,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
