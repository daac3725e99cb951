//! Registration gate.
//!
//! Every inbound event runs through [`gate`] before navigation or remark
//! handling. Unregistered operators are walked through sharing a contact,
//! then a name, then a position; nothing else gets through until the
//! profile is complete.

use rounds_core::registration::{
    Advance, RegistrationDraft, RegistrationEvent, RegistrationPrompt,
};
use rounds_core::types::{ChatId, UserId};
use rounds_db::repositories::UserRepo;
use rounds_telegram::InboundKind;
use tracing::{info, warn};

use crate::error::BotResult;
use crate::outbound::Markup;
use crate::state::AppState;

/// Outcome of the gate for one inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// The operator is registered; handle the event normally.
    Pass,
    /// The event was consumed by the registration flow.
    Blocked,
}

/// Run one event through the registration machine, performing whatever
/// side effects the machine asks for. The draft is the caller's session
/// copy and is written back by the dispatcher afterwards.
pub async fn gate(
    state: &AppState,
    draft: &mut RegistrationDraft,
    user_id: UserId,
    chat_id: ChatId,
    kind: &InboundKind,
) -> BotResult<Gate> {
    let profile = UserRepo::get_or_create(&state.pool, user_id).await?;
    if profile.is_registered() {
        // Rehydrate an in-memory draft lost to a restart.
        if !draft.is_satisfied() {
            *draft =
                RegistrationDraft::from_profile(profile.phone, profile.name, profile.position);
        }
        return Ok(Gate::Pass);
    }

    let mut event = registration_event(kind);
    loop {
        match draft.advance(event) {
            Advance::Blocked(prompt) => {
                send_prompt(state, chat_id, prompt).await?;
                return Ok(Gate::Blocked);
            }
            Advance::Captured => event = RegistrationEvent::Poll,
            Advance::Persist {
                phone,
                name,
                position,
            } => {
                UserRepo::complete_registration(&state.pool, user_id, &phone, &name, &position)
                    .await?;
                draft.mark_persisted();
                info!(user_id, name = %name, position = %position, "Registered new inspector");

                let confirmation = format!(
                    "🤖 You're all set, {name}! Pick a department to start your round."
                );
                state
                    .outbound
                    .send_text(chat_id, &confirmation, Markup::Remove)
                    .await?;
                announce_registration(state, &name, &position, &phone).await;
                event = RegistrationEvent::Poll;
            }
            Advance::Proceed => return Ok(Gate::Pass),
        }
    }
}

/// Slice of an inbound event the registration machine cares about.
fn registration_event(kind: &InboundKind) -> RegistrationEvent<'_> {
    match kind {
        InboundKind::ContactShared { phone } => RegistrationEvent::ContactShared { phone },
        InboundKind::Text(text) => RegistrationEvent::Text(text),
        _ => RegistrationEvent::Poll,
    }
}

async fn send_prompt(
    state: &AppState,
    chat_id: ChatId,
    prompt: RegistrationPrompt,
) -> BotResult<()> {
    let (text, markup) = match prompt {
        RegistrationPrompt::RequestContact => (
            "🤖 Welcome to the inspection rounds bot!\nShare your phone number to get started.",
            Markup::RequestContact("📱 Share phone number".to_string()),
        ),
        RegistrationPrompt::AskName => ("🤖 Thanks! What is your name?", Markup::Remove),
        RegistrationPrompt::AskPosition => ("🤖 And your position?", Markup::None),
    };
    state.outbound.send_text(chat_id, text, markup).await
}

/// Tell the ops channel about the new inspector. Failures are logged and
/// swallowed so a channel hiccup never blocks the operator's own flow.
async fn announce_registration(state: &AppState, name: &str, position: &str, phone: &str) {
    let text = format!("👤 New inspector registered: {name}, {position}, {phone}");
    if let Err(error) = state
        .outbound
        .send_text(state.config.ops_chat_id, &text, Markup::None)
        .await
    {
        warn!(%error, "Failed to announce registration to the ops channel");
    }
}
