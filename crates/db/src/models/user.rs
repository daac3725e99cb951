//! Inspector profile model.

use rounds_core::types::{Timestamp, UserId};
use sqlx::FromRow;

/// Full row from the `users` table.
///
/// Rows are created empty on a user's first update; the registration
/// fields stay `NULL` until the registration gate completes.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    /// Telegram sender id. Never the chat id.
    pub id: UserId,
    pub phone: Option<String>,
    pub name: Option<String>,
    pub position: Option<String>,
    /// Room the user currently has open, if any. May reference a room id
    /// that no longer exists in the hierarchy; callers must re-validate.
    pub current_room: Option<String>,
    pub created_at: Timestamp,
}

impl Profile {
    /// A profile counts as registered once phone, name and position are
    /// all filled in.
    pub fn is_registered(&self) -> bool {
        let filled =
            |field: &Option<String>| field.as_deref().is_some_and(|v| !v.trim().is_empty());
        filled(&self.phone) && filled(&self.name) && filled(&self.position)
    }
}
