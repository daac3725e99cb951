//! Long-poll dispatcher.
//!
//! One loop pulls updates from Telegram and handles them strictly in
//! arrival order. Sequential handling is what makes the per-user session
//! snapshot in [`handle_event`] safe without further locking. Per-update
//! errors are logged and never take the loop down; polling failures back
//! off and the loop resumes.

use std::sync::Arc;
use std::time::Duration;

use rounds_telegram::{classify, InboundEvent, InboundKind, TelegramApi};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::BotResult;
use crate::navigation::{self, MessageBody};
use crate::registration::{self, Gate};
use crate::state::AppState;

const POLL_RETRY_INITIAL: Duration = Duration::from_secs(1);
const POLL_RETRY_MAX: Duration = Duration::from_secs(30);

/// Poll for updates until the token cancels.
pub async fn run(state: AppState, api: Arc<TelegramApi>, cancel: CancellationToken) {
    info!("Dispatcher started");
    let mut offset: Option<i64> = None;
    let mut retry_delay = POLL_RETRY_INITIAL;

    loop {
        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.get_updates(offset, state.config.poll_timeout_secs) => result,
        };

        let updates = match result {
            Ok(updates) => {
                retry_delay = POLL_RETRY_INITIAL;
                updates
            }
            Err(error) => {
                warn!(
                    %error,
                    delay_secs = retry_delay.as_secs(),
                    "Polling failed, backing off"
                );
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(retry_delay) => {}
                }
                retry_delay = (retry_delay * 2).min(POLL_RETRY_MAX);
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            let Some(event) = classify(update) else {
                continue;
            };
            if let Err(error) = handle_event(&state, event).await {
                error!(%error, "Failed to handle update");
            }
        }
    }
    info!("Dispatcher stopped");
}

/// Handle one classified event: acknowledge, gate, then route.
pub async fn handle_event(state: &AppState, event: InboundEvent) -> BotResult<()> {
    let InboundEvent {
        sender_id,
        chat_id,
        kind,
    } = event;

    // Stop the client-side spinner no matter how handling goes.
    if let InboundKind::Callback { query_id, .. } = &kind {
        if let Err(error) = state.outbound.ack_callback(query_id).await {
            debug!(%error, "Failed to acknowledge callback query");
        }
    }

    // Snapshot the session, run the gate, write the snapshot back. The
    // write-back happens even when the gate errors so the draft stays in
    // step with whatever was already persisted.
    let mut session = state.sessions.get_or_create(sender_id).await;
    let gate =
        registration::gate(state, &mut session.registration, sender_id, chat_id, &kind).await;
    state.sessions.update(sender_id, session).await;
    if matches!(gate?, Gate::Blocked) {
        return Ok(());
    }

    match kind {
        InboundKind::Command(name) => {
            debug!(sender_id, command = %name, "Handling command");
            navigation::go_to_departments(state, sender_id, chat_id).await
        }
        // A registered user re-sharing a contact just gets the menu.
        InboundKind::ContactShared { .. } => {
            navigation::go_to_departments(state, sender_id, chat_id).await
        }
        InboundKind::Text(text) => {
            navigation::handle_message(state, sender_id, chat_id, MessageBody::Text(text)).await
        }
        InboundKind::Photo { file_id, caption } => {
            navigation::handle_message(
                state,
                sender_id,
                chat_id,
                MessageBody::Photo { file_id, caption },
            )
            .await
        }
        InboundKind::Callback { payload, .. } => {
            navigation::handle_callback(state, sender_id, chat_id, &payload).await
        }
    }
}
