//! Shared identifier aliases and small domain enums.

/// Telegram user identifiers are 64-bit integers.
pub type UserId = i64;

/// Telegram chat identifiers are 64-bit integers (group chats are negative).
pub type ChatId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar day used for remark scoping.
pub type Day = chrono::NaiveDate;

/// Remark kinds as stored in the `remarks.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemarkKind {
    Text,
    Photo,
    Status,
}

impl RemarkKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
            Self::Status => "status",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(Self::Text),
            "photo" => Some(Self::Photo),
            "status" => Some(Self::Status),
            _ => None,
        }
    }
}

/// Live inspection verdict for a room, carried by `status` remarks.
///
/// A room with no status remark is `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoomStatus {
    Good,
    #[default]
    Pending,
}

impl RoomStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Pending => "pending",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "good" => Some(Self::Good),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
