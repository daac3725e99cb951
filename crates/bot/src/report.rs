//! Day export to the operations channel.
//!
//! Walks every room in hierarchy order, sends the day's aggregated
//! remarks for rooms that still have open findings and bookends the run
//! with start and completion summaries. The export runs as its own task
//! so a slow, paced run never blocks inbound updates.

use chrono::Utc;
use rounds_core::hierarchy::{Department, Room};
use rounds_core::history::fold_history;
use rounds_core::types::{ChatId, Day, UserId};
use rounds_db::repositories::RemarkRepo;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::error::{BotError, BotResult};
use crate::navigation::history_entries;
use crate::outbound::{send_batches, Markup};
use crate::state::AppState;

/// Totals accumulated over one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    /// Rooms whose remarks were forwarded.
    pub rooms: usize,
    /// Text and photo remarks forwarded across those rooms.
    pub remarks: usize,
}

/// Handle the send-report button: claim the export slot and spawn the
/// run for today. Refuses politely while a previous run is still going.
pub async fn trigger_export(state: &AppState, user_id: UserId, chat_id: ChatId) -> BotResult<()> {
    if !state.try_begin_export() {
        return state
            .outbound
            .send_text(chat_id, "📤 An export is already running.", Markup::None)
            .await;
    }
    let day = Utc::now().date_naive();
    info!(user_id, %day, "Starting report export");

    let task_state = state.clone();
    tokio::spawn(async move {
        let reporter = Reporter::new(task_state.clone(), chat_id);
        match reporter.export_day(day).await {
            Ok(summary) => info!(
                rooms = summary.rooms,
                remarks = summary.remarks,
                "Report export finished"
            ),
            Err(error) => error!(%error, "Report export failed"),
        }
        task_state.finish_export();
    });
    Ok(())
}

/// One export run: the state it works on plus the chat that asked for it.
pub struct Reporter {
    state: AppState,
    requested_by: ChatId,
}

impl Reporter {
    pub fn new(state: AppState, requested_by: ChatId) -> Self {
        Self {
            state,
            requested_by,
        }
    }

    /// Export one day's remarks to the operations channel.
    ///
    /// Rooms are visited in hierarchy order. A room is skipped when its
    /// remark set for the day is empty or contains a good status. A send
    /// failure aborts only the current room; storage failures abort the
    /// whole run.
    pub async fn export_day(&self, day: Day) -> BotResult<ExportSummary> {
        self.broadcast(&format!("📤 Exporting remarks for {day}…"))
            .await?;

        let mut summary = ExportSummary::default();
        for department in self.state.hierarchy.departments() {
            for room in &department.rooms {
                match self.export_room(department, room, day).await {
                    Ok(None) => {}
                    Ok(Some(count)) => {
                        summary.rooms += 1;
                        summary.remarks += count;
                        sleep(self.state.config.export_pacing).await;
                    }
                    Err(BotError::Telegram(error)) => {
                        warn!(%error, room_id = %room.id, "Skipping room after send failure");
                    }
                    Err(other) => return Err(other),
                }
            }
        }

        self.broadcast(&format!(
            "📤 Export finished for {day}: {} room(s), {} remark(s).",
            summary.rooms, summary.remarks
        ))
        .await?;
        Ok(summary)
    }

    /// Send one room's remarks. Returns `None` when the room does not
    /// qualify, otherwise the number of remarks forwarded.
    async fn export_room(
        &self,
        department: &Department,
        room: &Room,
        day: Day,
    ) -> BotResult<Option<usize>> {
        let rows = RemarkRepo::list_for_room(&self.state.pool, &room.id, Some(day)).await?;
        if rows.iter().any(|row| row.is_good_status()) {
            return Ok(None);
        }
        let entries = history_entries(&rows);
        if entries.is_empty() {
            return Ok(None);
        }
        let count = entries.len();

        let ops = self.state.config.ops_chat_id;
        let header = format!(
            "📍 {}\n➡️ {} ({count} remark(s))",
            department.title, room.name
        );
        self.state
            .outbound
            .send_text(ops, &header, Markup::None)
            .await?;
        send_batches(self.state.outbound.as_ref(), ops, &fold_history(entries)).await?;
        Ok(Some(count))
    }

    /// Send a run summary to the requesting chat and the ops channel,
    /// once when they are the same chat.
    async fn broadcast(&self, text: &str) -> BotResult<()> {
        self.state
            .outbound
            .send_text(self.requested_by, text, Markup::None)
            .await?;
        if self.requested_by != self.state.config.ops_chat_id {
            self.state
                .outbound
                .send_text(self.state.config.ops_chat_id, text, Markup::None)
                .await?;
        }
        Ok(())
    }
}
