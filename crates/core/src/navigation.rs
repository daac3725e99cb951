//! Callback payload grammar.
//!
//! Inline buttons carry flat string payloads. The grammar has two fixed
//! words, three prefixed forms and two bare forms resolved against the
//! hierarchy:
//!
//! | payload                  | action                         |
//! |--------------------------|--------------------------------|
//! | `back_to_departments`    | show the department menu       |
//! | `send_report`            | trigger the day export         |
//! | `back_to_<dept>`         | show a department's room menu  |
//! | `mark_good_<room>`       | close a room's remarks         |
//! | `open_comments_<room>`   | reopen a room's remarks        |
//! | `<dept key>`             | show that department's rooms   |
//! | `<room id>`              | open that room                 |
//!
//! Hierarchy validation guarantees keys and ids never collide with the
//! reserved words and prefixes, so parsing is unambiguous.

use crate::hierarchy::Hierarchy;

pub const CB_BACK_TO_DEPARTMENTS: &str = "back_to_departments";
pub const CB_SEND_REPORT: &str = "send_report";
pub const CB_BACK_PREFIX: &str = "back_to_";
pub const CB_MARK_GOOD_PREFIX: &str = "mark_good_";
pub const CB_OPEN_COMMENTS_PREFIX: &str = "open_comments_";

/// A parsed callback payload. Targets are validated against the hierarchy;
/// payloads that do not resolve come back as [`NavAction::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavAction {
    SelectDepartment(String),
    SelectRoom(String),
    BackToDepartments,
    BackToDepartment(String),
    MarkGood(String),
    OpenComments(String),
    SendReport,
    Unknown,
}

/// Build the payload that returns to a department's room menu.
pub fn cb_back_to(department_key: &str) -> String {
    format!("{CB_BACK_PREFIX}{department_key}")
}

/// Build the payload that marks a room as good.
pub fn cb_mark_good(room_id: &str) -> String {
    format!("{CB_MARK_GOOD_PREFIX}{room_id}")
}

/// Build the payload that reopens a room's remarks.
pub fn cb_open_comments(room_id: &str) -> String {
    format!("{CB_OPEN_COMMENTS_PREFIX}{room_id}")
}

/// Parse a raw callback payload into a navigation action.
pub fn parse_callback(hierarchy: &Hierarchy, payload: &str) -> NavAction {
    if let Some(room_id) = payload.strip_prefix(CB_MARK_GOOD_PREFIX) {
        return if hierarchy.resolve_room(room_id).is_some() {
            NavAction::MarkGood(room_id.to_string())
        } else {
            NavAction::Unknown
        };
    }
    if let Some(room_id) = payload.strip_prefix(CB_OPEN_COMMENTS_PREFIX) {
        return if hierarchy.resolve_room(room_id).is_some() {
            NavAction::OpenComments(room_id.to_string())
        } else {
            NavAction::Unknown
        };
    }
    // The exact word wins over the `back_to_` prefix it shares.
    if payload == CB_BACK_TO_DEPARTMENTS {
        return NavAction::BackToDepartments;
    }
    if payload == CB_SEND_REPORT {
        return NavAction::SendReport;
    }
    if let Some(key) = payload.strip_prefix(CB_BACK_PREFIX) {
        return if hierarchy.department(key).is_some() {
            NavAction::BackToDepartment(key.to_string())
        } else {
            NavAction::Unknown
        };
    }
    if hierarchy.department(payload).is_some() {
        return NavAction::SelectDepartment(payload.to_string());
    }
    if hierarchy.resolve_room(payload).is_some() {
        return NavAction::SelectRoom(payload.to_string());
    }
    NavAction::Unknown
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
