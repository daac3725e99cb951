//! In-memory per-user transient state.
//!
//! Sessions only hold what must not survive a restart: the registration
//! draft being collected. Navigation position lives in the database.
//! Handlers snapshot a session, work on the copy without holding the
//! lock, and write it back; the dispatcher processes updates
//! sequentially, so per-user writes never interleave.

use std::collections::HashMap;
use std::sync::Arc;

use rounds_core::registration::RegistrationDraft;
use rounds_core::types::UserId;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub registration: RegistrationDraft,
}

/// Shared map of user id to session.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<UserId, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the session for `user_id`, creating a default one on
    /// first sight.
    pub async fn get_or_create(&self, user_id: UserId) -> Session {
        let mut sessions = self.inner.lock().await;
        sessions.entry(user_id).or_default().clone()
    }

    /// Write a session back after handling an update.
    pub async fn update(&self, user_id: UserId, session: Session) {
        let mut sessions = self.inner.lock().await;
        sessions.insert(user_id, session);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
