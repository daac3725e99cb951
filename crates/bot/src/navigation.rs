//! Menu navigation and remark capture.
//!
//! Callback presses move the operator through the department and room
//! menus; free-form texts and photos land in whichever room the operator
//! currently has open. All menu rendering is delegated to `rounds_core`;
//! this module wires storage aggregates and the transport to it.

use std::collections::HashMap;

use rounds_core::history::{fold_history, HistoryEntry};
use rounds_core::menu::{
    back_to_department_rows, department_menu, report_ready, room_menu, room_view, MenuView,
    RoomStats,
};
use rounds_core::navigation::{parse_callback, NavAction};
use rounds_core::types::{ChatId, Day, RemarkKind, RoomStatus, UserId};
use rounds_core::CoreError;
use rounds_db::models::{NewRemark, Remark};
use rounds_db::repositories::{RemarkRepo, UserRepo};
use rounds_db::DbPool;
use tracing::{info, warn};

use crate::error::BotResult;
use crate::outbound::{send_batches, Markup};
use crate::report;
use crate::state::AppState;

/// Free-form message content that may become a remark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    Text(String),
    Photo {
        file_id: String,
        caption: Option<String>,
    },
}

/// Build the per-room aggregates the menus render from.
pub(crate) async fn collect_stats(
    pool: &DbPool,
    day: Option<Day>,
) -> Result<HashMap<String, RoomStats>, sqlx::Error> {
    let mut stats: HashMap<String, RoomStats> = HashMap::new();
    for (room_id, count) in RemarkRepo::counts_by_room(pool, day).await? {
        stats.entry(room_id).or_default().remark_count = count;
    }
    for room_id in RemarkRepo::good_rooms(pool, day).await? {
        stats.entry(room_id).or_default().status = RoomStatus::Good;
    }
    Ok(stats)
}

async fn send_view(state: &AppState, chat_id: ChatId, view: MenuView) -> BotResult<()> {
    state
        .outbound
        .send_text(chat_id, &view.text, Markup::Inline(view.rows))
        .await
}

async fn send_department_menu(state: &AppState, chat_id: ChatId) -> BotResult<()> {
    let stats = collect_stats(&state.pool, state.nav_day()).await?;
    let show_report = report_ready(&state.hierarchy, &stats);
    let view = department_menu(&state.hierarchy, &stats, show_report);
    send_view(state, chat_id, view).await
}

/// Leave whatever room is open and show the department list. Entry point
/// for `/start` and the back-to-departments button.
pub async fn go_to_departments(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
) -> BotResult<()> {
    UserRepo::set_current_room(&state.pool, user_id, None).await?;
    send_department_menu(state, chat_id).await
}

/// Show one department's room list. Clears the open room: messages sent
/// while a menu is up should never land in a previously opened room.
async fn show_room_menu(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    department_key: &str,
) -> BotResult<()> {
    let department = state
        .hierarchy
        .department(department_key)
        .ok_or_else(|| CoreError::DepartmentNotFound(department_key.to_string()))?;
    UserRepo::set_current_room(&state.pool, user_id, None).await?;
    let stats = collect_stats(&state.pool, state.nav_day()).await?;
    send_view(state, chat_id, room_menu(department, &stats)).await
}

/// Handle one inline-keyboard press. The dispatcher has already
/// acknowledged the callback query.
pub async fn handle_callback(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    payload: &str,
) -> BotResult<()> {
    match parse_callback(&state.hierarchy, payload) {
        NavAction::SelectDepartment(key) | NavAction::BackToDepartment(key) => {
            show_room_menu(state, user_id, chat_id, &key).await
        }
        NavAction::BackToDepartments => go_to_departments(state, user_id, chat_id).await,
        NavAction::SelectRoom(room_id) => select_room(state, user_id, chat_id, &room_id).await,
        NavAction::MarkGood(room_id) => mark_good(state, user_id, chat_id, &room_id).await,
        NavAction::OpenComments(room_id) => {
            open_comments(state, user_id, chat_id, &room_id).await
        }
        NavAction::SendReport => report::trigger_export(state, user_id, chat_id).await,
        NavAction::Unknown => {
            warn!(user_id, payload, "Unresolvable callback payload");
            state
                .outbound
                .send_text(chat_id, "Error: room not found.", Markup::None)
                .await
        }
    }
}

/// Open a room: remember it as current, replay its remark history and
/// show the room view.
async fn select_room(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    room_id: &str,
) -> BotResult<()> {
    let (department, room) = state
        .hierarchy
        .resolve_room(room_id)
        .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))?;
    let day = state.nav_day();
    let stats = RoomStats {
        remark_count: RemarkRepo::count_for_room(&state.pool, room_id, day).await?,
        status: RemarkRepo::room_status(&state.pool, room_id, day).await?,
    };
    UserRepo::set_current_room(&state.pool, user_id, Some(room_id)).await?;

    // A closed room shows its summary view only; history comes back out
    // when remarks are reopened.
    if stats.status != RoomStatus::Good && stats.remark_count > 0 {
        replay_history(state, chat_id, room_id, day).await?;
    }
    send_view(state, chat_id, room_view(department, room, stats)).await
}

async fn mark_good(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    room_id: &str,
) -> BotResult<()> {
    let (department, _room) = state
        .hierarchy
        .resolve_room(room_id)
        .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))?;
    let day = state.nav_day();
    let count = RemarkRepo::count_for_room(&state.pool, room_id, day).await?;
    RemarkRepo::set_room_status(&state.pool, room_id, user_id, RoomStatus::Good, day).await?;
    info!(user_id, room_id, "Room marked as good");

    let text = format!(
        "🤖 Room marked as good 👍\nIts {count} remark(s) will not be forwarded."
    );
    state.outbound.send_text(chat_id, &text, Markup::None).await?;
    show_room_menu(state, user_id, chat_id, &department.key).await
}

/// Reopen a closed room's remarks and put the operator back in it.
async fn open_comments(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    room_id: &str,
) -> BotResult<()> {
    let (department, _room) = state
        .hierarchy
        .resolve_room(room_id)
        .ok_or_else(|| CoreError::RoomNotFound(room_id.to_string()))?;
    let day = state.nav_day();
    RemarkRepo::set_room_status(&state.pool, room_id, user_id, RoomStatus::Pending, day).await?;
    UserRepo::set_current_room(&state.pool, user_id, Some(room_id)).await?;
    info!(user_id, room_id, "Room remarks reopened");

    replay_history(state, chat_id, room_id, day).await?;
    state
        .outbound
        .send_text(
            chat_id,
            "🤖 Remarks reopened ✍️ You can continue commenting.",
            Markup::Inline(back_to_department_rows(&department.key)),
        )
        .await
}

/// Record a text or photo remark in the operator's open room. Without an
/// open room the message is answered with the department menu instead.
pub async fn handle_message(
    state: &AppState,
    user_id: UserId,
    chat_id: ChatId,
    body: MessageBody,
) -> BotResult<()> {
    let profile = UserRepo::get_or_create(&state.pool, user_id).await?;
    let Some(room_id) = profile.current_room else {
        return send_department_menu(state, chat_id).await;
    };
    let Some((department, _room)) = state.hierarchy.resolve_room(&room_id) else {
        // The hierarchy file changed under a stored pointer.
        warn!(user_id, %room_id, "Open room no longer exists, resetting");
        return go_to_departments(state, user_id, chat_id).await;
    };

    let remark = match &body {
        MessageBody::Text(text) => NewRemark {
            user_id,
            room_id: &room_id,
            kind: RemarkKind::Text,
            content: text,
            caption: None,
        },
        MessageBody::Photo { file_id, caption } => NewRemark {
            user_id,
            room_id: &room_id,
            kind: RemarkKind::Photo,
            content: file_id,
            caption: caption.as_deref(),
        },
    };
    RemarkRepo::create(&state.pool, &remark).await?;
    let count = RemarkRepo::count_for_room(&state.pool, &room_id, state.nav_day()).await?;
    info!(user_id, %room_id, count, "Remark recorded");

    let text = format!(
        "🤖 Thanks! The room now has {count} remark(s).\nKeep writing here or move on to the next room."
    );
    state
        .outbound
        .send_text(
            chat_id,
            &text,
            Markup::Inline(back_to_department_rows(&department.key)),
        )
        .await
}

/// Map stored remark rows to history entries, dropping status markers.
pub(crate) fn history_entries(remarks: &[Remark]) -> Vec<HistoryEntry> {
    remarks
        .iter()
        .filter_map(|remark| match remark.kind()? {
            RemarkKind::Text => Some(HistoryEntry::Text(remark.content.clone())),
            RemarkKind::Photo => Some(HistoryEntry::Photo {
                file_id: remark.content.clone(),
                caption: remark.caption.clone(),
            }),
            RemarkKind::Status => None,
        })
        .collect()
}

/// Play a room's remark history back into the chat.
async fn replay_history(
    state: &AppState,
    chat_id: ChatId,
    room_id: &str,
    day: Option<Day>,
) -> BotResult<()> {
    let remarks = RemarkRepo::list_for_room(&state.pool, room_id, day).await?;
    let batches = fold_history(history_entries(&remarks));
    if batches.is_empty() {
        return Ok(());
    }
    state
        .outbound
        .send_text(chat_id, "🤖 Earlier you wrote:", Markup::None)
        .await?;
    send_batches(state.outbound.as_ref(), chat_id, &batches).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
