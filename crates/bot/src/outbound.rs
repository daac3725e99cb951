//! Outbound transport seam.
//!
//! Handlers never touch the Telegram client directly; they talk through
//! the [`Outbound`] trait in terms of domain-level sends. The production
//! implementation wraps [`TelegramApi`] with rate-limit retry; tests
//! substitute a recording double.

use std::sync::Arc;

use async_trait::async_trait;
use rounds_core::history::Batch;
use rounds_core::menu::MenuButton;
use rounds_core::types::ChatId;
use rounds_telegram::types::{InputMediaPhoto, ReplyMarkup};
use rounds_telegram::{send_with_retry, RetryConfig, TelegramApi};

use crate::error::BotResult;

/// Keyboard attached to an outgoing text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    None,
    /// Inline keyboard built from menu rows.
    Inline(Vec<Vec<MenuButton>>),
    /// One-time reply keyboard with a single contact-request button.
    RequestContact(String),
    /// Remove any visible reply keyboard.
    Remove,
}

#[async_trait]
pub trait Outbound: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str, markup: Markup) -> BotResult<()>;

    async fn send_photo(
        &self,
        chat_id: ChatId,
        file_id: &str,
        caption: Option<&str>,
    ) -> BotResult<()>;

    /// Send several photos as one album. Callers guarantee 2 to 10 ids.
    async fn send_album(
        &self,
        chat_id: ChatId,
        file_ids: &[String],
        caption: Option<&str>,
    ) -> BotResult<()>;

    /// Stop the client-side spinner after an inline button press.
    async fn ack_callback(&self, query_id: &str) -> BotResult<()>;
}

/// Play a folded remark history into a chat, one batch per message.
/// Single-photo batches go out as plain photos; larger ones as albums.
pub async fn send_batches(
    outbound: &dyn Outbound,
    chat_id: ChatId,
    batches: &[Batch],
) -> BotResult<()> {
    for batch in batches {
        match batch {
            Batch::Text(text) => outbound.send_text(chat_id, text, Markup::None).await?,
            Batch::Photos { file_ids, caption } => match file_ids.as_slice() {
                [] => {}
                [only] => {
                    outbound
                        .send_photo(chat_id, only, caption.as_deref())
                        .await?
                }
                _ => {
                    outbound
                        .send_album(chat_id, file_ids, caption.as_deref())
                        .await?
                }
            },
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Telegram-backed implementation
// ---------------------------------------------------------------------------

/// Production transport: [`TelegramApi`] plus rate-limit retry.
pub struct TelegramOutbound {
    api: Arc<TelegramApi>,
    retry: RetryConfig,
}

impl TelegramOutbound {
    pub fn new(api: Arc<TelegramApi>, retry: RetryConfig) -> Self {
        Self { api, retry }
    }
}

fn to_reply_markup(markup: Markup) -> Option<ReplyMarkup> {
    match markup {
        Markup::None => None,
        Markup::Inline(rows) => Some(ReplyMarkup::inline(
            rows.into_iter()
                .map(|row| {
                    row.into_iter()
                        .map(|MenuButton { label, callback }| (label, callback))
                        .collect()
                })
                .collect(),
        )),
        Markup::RequestContact(label) => Some(ReplyMarkup::request_contact(label)),
        Markup::Remove => Some(ReplyMarkup::remove()),
    }
}

#[async_trait]
impl Outbound for TelegramOutbound {
    async fn send_text(&self, chat_id: ChatId, text: &str, markup: Markup) -> BotResult<()> {
        let markup = to_reply_markup(markup);
        send_with_retry(&self.retry, || {
            self.api.send_message(chat_id, text, markup.as_ref())
        })
        .await?;
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        file_id: &str,
        caption: Option<&str>,
    ) -> BotResult<()> {
        send_with_retry(&self.retry, || {
            self.api.send_photo(chat_id, file_id, caption)
        })
        .await?;
        Ok(())
    }

    async fn send_album(
        &self,
        chat_id: ChatId,
        file_ids: &[String],
        caption: Option<&str>,
    ) -> BotResult<()> {
        // The album caption sits on the first item.
        let media: Vec<InputMediaPhoto> = file_ids
            .iter()
            .enumerate()
            .map(|(i, file_id)| {
                let caption = (i == 0).then(|| caption.map(str::to_string)).flatten();
                InputMediaPhoto::new(file_id.clone(), caption)
            })
            .collect();
        send_with_retry(&self.retry, || self.api.send_media_group(chat_id, &media)).await?;
        Ok(())
    }

    async fn ack_callback(&self, query_id: &str) -> BotResult<()> {
        // No retry: acks are cosmetic and expire server-side anyway.
        self.api.answer_callback_query(query_id).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
