//! Shared fixtures for bot integration tests.
//!
//! Provides a recording transport double, a small fixed hierarchy and
//! event constructors so flow tests read as conversations.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rounds_bot::config::BotConfig;
use rounds_bot::error::BotResult;
use rounds_bot::outbound::{Markup, Outbound};
use rounds_bot::state::AppState;
use rounds_core::Hierarchy;
use rounds_db::DbPool;
use rounds_telegram::{InboundEvent, InboundKind};
use tokio::sync::Mutex;

/// Ops channel id used by every test state. Group ids are negative.
pub const OPS_CHAT: i64 = -100_500;

/// One outbound call captured by [`RecordingOutbound`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sent {
    Text {
        chat_id: i64,
        text: String,
        markup: Markup,
    },
    Photo {
        chat_id: i64,
        file_id: String,
        caption: Option<String>,
    },
    Album {
        chat_id: i64,
        file_ids: Vec<String>,
        caption: Option<String>,
    },
    Ack {
        query_id: String,
    },
}

/// Transport double that records every send instead of talking to
/// Telegram.
#[derive(Default)]
pub struct RecordingOutbound {
    sent: Mutex<Vec<Sent>>,
}

impl RecordingOutbound {
    /// Drain everything recorded so far.
    pub async fn take(&self) -> Vec<Sent> {
        std::mem::take(&mut *self.sent.lock().await)
    }
}

#[async_trait]
impl Outbound for RecordingOutbound {
    async fn send_text(&self, chat_id: i64, text: &str, markup: Markup) -> BotResult<()> {
        self.sent.lock().await.push(Sent::Text {
            chat_id,
            text: text.to_string(),
            markup,
        });
        Ok(())
    }

    async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
    ) -> BotResult<()> {
        self.sent.lock().await.push(Sent::Photo {
            chat_id,
            file_id: file_id.to_string(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn send_album(
        &self,
        chat_id: i64,
        file_ids: &[String],
        caption: Option<&str>,
    ) -> BotResult<()> {
        self.sent.lock().await.push(Sent::Album {
            chat_id,
            file_ids: file_ids.to_vec(),
            caption: caption.map(str::to_string),
        });
        Ok(())
    }

    async fn ack_callback(&self, query_id: &str) -> BotResult<()> {
        self.sent.lock().await.push(Sent::Ack {
            query_id: query_id.to_string(),
        });
        Ok(())
    }
}

/// Two departments, three rooms. Small enough to cover fully in a test.
pub fn test_hierarchy() -> Hierarchy {
    Hierarchy::from_json(
        r#"[
            {
                "key": "first_floor",
                "title": "First floor",
                "rooms": [
                    { "id": "kitchen", "name": "Kitchen", "intermediate_message": "Check the stoves." },
                    { "id": "lobby", "name": "Lobby" }
                ]
            },
            {
                "key": "basement",
                "title": "Basement",
                "rooms": [
                    { "id": "boiler", "name": "Boiler room" }
                ]
            }
        ]"#,
    )
    .expect("test hierarchy")
}

/// Build an [`AppState`] over the given pool with a recording transport.
/// Export pacing is zero so export tests run instantly.
pub fn test_state(pool: DbPool) -> (AppState, Arc<RecordingOutbound>) {
    let outbound = Arc::new(RecordingOutbound::default());
    let config = BotConfig {
        token: "test-token".into(),
        ops_chat_id: OPS_CHAT,
        database_url: String::new(),
        hierarchy_path: String::new(),
        day_scoped: false,
        export_pacing: Duration::ZERO,
        poll_timeout_secs: 1,
    };
    let state = AppState::new(
        pool,
        Arc::new(test_hierarchy()),
        Arc::clone(&outbound) as Arc<dyn Outbound>,
        Arc::new(config),
    );
    (state, outbound)
}

// ---- event constructors ----

pub fn command_event(user: i64, name: &str) -> InboundEvent {
    InboundEvent {
        sender_id: user,
        chat_id: user,
        kind: InboundKind::Command(name.to_string()),
    }
}

pub fn text_event(user: i64, text: &str) -> InboundEvent {
    InboundEvent {
        sender_id: user,
        chat_id: user,
        kind: InboundKind::Text(text.to_string()),
    }
}

pub fn photo_event(user: i64, file_id: &str, caption: Option<&str>) -> InboundEvent {
    InboundEvent {
        sender_id: user,
        chat_id: user,
        kind: InboundKind::Photo {
            file_id: file_id.to_string(),
            caption: caption.map(str::to_string),
        },
    }
}

pub fn contact_event(user: i64, phone: &str) -> InboundEvent {
    InboundEvent {
        sender_id: user,
        chat_id: user,
        kind: InboundKind::ContactShared {
            phone: phone.to_string(),
        },
    }
}

pub fn callback_event(user: i64, payload: &str) -> InboundEvent {
    InboundEvent {
        sender_id: user,
        chat_id: user,
        kind: InboundKind::Callback {
            payload: payload.to_string(),
            query_id: "cbq-test".to_string(),
        },
    }
}

/// Walk a user through the whole registration flow and drop the chatter.
pub async fn register(state: &AppState, outbound: &RecordingOutbound, user: i64) {
    rounds_bot::dispatch::handle_event(state, contact_event(user, "+15550001122"))
        .await
        .expect("share contact");
    rounds_bot::dispatch::handle_event(state, text_event(user, "Dana"))
        .await
        .expect("send name");
    rounds_bot::dispatch::handle_event(state, text_event(user, "Shift lead"))
        .await
        .expect("send position");
    outbound.take().await;
}

/// Texts sent to one chat, in order. Ignores photos, albums and acks.
pub fn texts_to(sent: &[Sent], chat_id: i64) -> Vec<String> {
    sent.iter()
        .filter_map(|item| match item {
            Sent::Text {
                chat_id: c, text, ..
            } if *c == chat_id => Some(text.clone()),
            _ => None,
        })
        .collect()
}

/// Inline keyboard rows of the last text sent to a chat.
pub fn last_inline_rows(sent: &[Sent], chat_id: i64) -> Vec<Vec<rounds_core::menu::MenuButton>> {
    sent.iter()
        .rev()
        .find_map(|item| match item {
            Sent::Text {
                chat_id: c,
                markup: Markup::Inline(rows),
                ..
            } if *c == chat_id => Some(rows.clone()),
            _ => None,
        })
        .expect("no inline keyboard was sent")
}
