//! Menu rendering: message texts, inline keyboards and progress glyphs.
//!
//! Handlers gather per-room aggregates ([`RoomStats`]) from storage and
//! hand them to these pure functions, which produce a [`MenuView`] the
//! transport layer turns into a message with an inline keyboard.
//!
//! Glyph policy. A room shows 👍 once marked good, ✍️ while it has
//! remarks and stays open, ⬜ otherwise. A department shows ✅ when every
//! room is covered (has remarks or is marked good), ✍️ with a
//! `covered/total` fraction when partially covered, ⬜ when untouched.

use std::collections::HashMap;

use crate::hierarchy::{Department, Hierarchy, Room};
use crate::navigation::{
    cb_back_to, cb_mark_good, cb_open_comments, CB_BACK_TO_DEPARTMENTS, CB_SEND_REPORT,
};
use crate::types::RoomStatus;

pub const GLYPH_GOOD: &str = "👍";
pub const GLYPH_COMMENTED: &str = "✍️";
pub const GLYPH_EMPTY: &str = "⬜";
pub const GLYPH_COMPLETE: &str = "✅";

/// One inline button: label plus callback payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuButton {
    pub label: String,
    pub callback: String,
}

impl MenuButton {
    pub fn new(label: impl Into<String>, callback: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            callback: callback.into(),
        }
    }
}

/// A rendered menu: message text plus inline keyboard rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuView {
    pub text: String,
    pub rows: Vec<Vec<MenuButton>>,
}

/// Live aggregate for one room, derived from the remark log.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomStats {
    /// Number of text/photo remarks (status remarks excluded).
    pub remark_count: i64,
    pub status: RoomStatus,
}

impl RoomStats {
    /// A room counts as covered once it has any remark or was marked good.
    pub fn is_covered(self) -> bool {
        self.status == RoomStatus::Good || self.remark_count > 0
    }

    pub fn glyph(self) -> &'static str {
        if self.status == RoomStatus::Good {
            GLYPH_GOOD
        } else if self.remark_count > 0 {
            GLYPH_COMMENTED
        } else {
            GLYPH_EMPTY
        }
    }
}

fn room_stats(stats: &HashMap<String, RoomStats>, room_id: &str) -> RoomStats {
    stats.get(room_id).copied().unwrap_or_default()
}

/// Covered and total room counts for one department.
pub fn department_progress(
    department: &Department,
    stats: &HashMap<String, RoomStats>,
) -> (usize, usize) {
    let covered = department
        .rooms
        .iter()
        .filter(|room| room_stats(stats, &room.id).is_covered())
        .count();
    (covered, department.rooms.len())
}

pub fn department_glyph(covered: usize, total: usize) -> &'static str {
    if total > 0 && covered == total {
        GLYPH_COMPLETE
    } else if covered > 0 {
        GLYPH_COMMENTED
    } else {
        GLYPH_EMPTY
    }
}

/// True once every room in the hierarchy is covered.
pub fn report_ready(hierarchy: &Hierarchy, stats: &HashMap<String, RoomStats>) -> bool {
    hierarchy
        .departments()
        .iter()
        .flat_map(|d| d.rooms.iter())
        .all(|room| room_stats(stats, &room.id).is_covered())
}

/// Top-level department menu. Shows the export button once the round is
/// complete.
pub fn department_menu(
    hierarchy: &Hierarchy,
    stats: &HashMap<String, RoomStats>,
    show_report: bool,
) -> MenuView {
    let mut rows: Vec<Vec<MenuButton>> = hierarchy
        .departments()
        .iter()
        .map(|department| {
            let (covered, total) = department_progress(department, stats);
            let glyph = department_glyph(covered, total);
            let label = if glyph == GLYPH_COMMENTED {
                format!("{glyph} {} {covered}/{total}", department.title)
            } else {
                format!("{glyph} {}", department.title)
            };
            vec![MenuButton::new(label, department.key.clone())]
        })
        .collect();
    if show_report {
        rows.push(vec![MenuButton::new(
            "📤 Send today's report",
            CB_SEND_REPORT,
        )]);
    }
    MenuView {
        text: "🤖 Choose a department:".to_string(),
        rows,
    }
}

/// Room list for one department.
pub fn room_menu(department: &Department, stats: &HashMap<String, RoomStats>) -> MenuView {
    let mut rows: Vec<Vec<MenuButton>> = department
        .rooms
        .iter()
        .map(|room| {
            let s = room_stats(stats, &room.id);
            let label = if s.status == RoomStatus::Good {
                format!("{GLYPH_GOOD} {}", room.name)
            } else if s.remark_count > 0 {
                format!("{GLYPH_COMMENTED} {} ({})", room.name, s.remark_count)
            } else {
                format!("{GLYPH_EMPTY} {}", room.name)
            };
            vec![MenuButton::new(label, room.id.clone())]
        })
        .collect();
    rows.push(vec![MenuButton::new(
        "⬅️ Back to departments",
        CB_BACK_TO_DEPARTMENTS,
    )]);
    MenuView {
        text: format!("📍 {}\nChoose a room:", department.title),
        rows,
    }
}

/// Keyboard row leading back to a department's room menu.
pub fn back_to_department_rows(department_key: &str) -> Vec<Vec<MenuButton>> {
    vec![vec![MenuButton::new(
        "⬅️ Back to department",
        cb_back_to(department_key),
    )]]
}

/// The message shown when a room is opened.
pub fn room_view(department: &Department, room: &Room, stats: RoomStats) -> MenuView {
    let destination = format!("📍 {}\n➡️ {}", department.title, room.name);
    if stats.status == RoomStatus::Good {
        MenuView {
            text: format!(
                "🤖 Marked as good, {} remark(s) will not be forwarded 👍\n\n{destination}",
                stats.remark_count
            ),
            rows: vec![
                vec![MenuButton::new(
                    "✍️ Reopen remarks ✍️",
                    cb_open_comments(&room.id),
                )],
                vec![MenuButton::new(
                    "⬅️ Back to department",
                    cb_back_to(&department.key),
                )],
            ],
        }
    } else {
        let mut text = format!(
            "🤖 You are in this room, it has {} remark(s).\nSend text or photos here to add more.",
            stats.remark_count
        );
        if !room.intermediate_message.is_empty() {
            text.push_str("\n\n");
            text.push_str(&room.intermediate_message);
        }
        text.push_str("\n\n");
        text.push_str(&destination);
        MenuView {
            text,
            rows: vec![
                vec![MenuButton::new(
                    "👍 All good, close remarks 👍",
                    cb_mark_good(&room.id),
                )],
                vec![MenuButton::new(
                    "⬅️ Back to department",
                    cb_back_to(&department.key),
                )],
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
