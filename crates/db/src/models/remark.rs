//! Remark model and insert DTO.

use rounds_core::types::{Day, RemarkKind, RoomStatus, Timestamp, UserId};
use sqlx::FromRow;

/// Full row from the `remarks` table.
///
/// `content` holds the message text for `text` remarks, the Telegram file
/// id for `photo` remarks and the status value for `status` remarks.
#[derive(Debug, Clone, FromRow)]
pub struct Remark {
    pub id: i64,
    pub user_id: UserId,
    pub room_id: String,
    pub kind: String,
    pub content: String,
    /// Photo caption as typed, without any display prefix.
    pub caption: Option<String>,
    /// Calendar day the remark was recorded on.
    pub day: Day,
    pub created_at: Timestamp,
}

impl Remark {
    pub fn kind(&self) -> Option<RemarkKind> {
        RemarkKind::parse(&self.kind)
    }

    pub fn is_status(&self) -> bool {
        self.kind() == Some(RemarkKind::Status)
    }

    /// True for the status remark that closes a room.
    pub fn is_good_status(&self) -> bool {
        self.is_status() && RoomStatus::parse(&self.content) == Some(RoomStatus::Good)
    }
}

/// DTO for appending a remark.
#[derive(Debug, Clone)]
pub struct NewRemark<'a> {
    pub user_id: UserId,
    pub room_id: &'a str,
    pub kind: RemarkKind,
    pub content: &'a str,
    pub caption: Option<&'a str>,
}
