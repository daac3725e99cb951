//! Shared application state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rounds_core::types::Day;
use rounds_core::Hierarchy;
use rounds_db::DbPool;

use crate::config::BotConfig;
use crate::outbound::Outbound;
use crate::sessions::SessionStore;

/// State shared by every handler.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is itself a
/// shared handle).
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub hierarchy: Arc<Hierarchy>,
    pub outbound: Arc<dyn Outbound>,
    pub sessions: SessionStore,
    pub config: Arc<BotConfig>,
    export_running: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(
        pool: DbPool,
        hierarchy: Arc<Hierarchy>,
        outbound: Arc<dyn Outbound>,
        config: Arc<BotConfig>,
    ) -> Self {
        Self {
            pool,
            hierarchy,
            outbound,
            sessions: SessionStore::new(),
            config,
            export_running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Day filter applied to remark queries when the deployment scopes
    /// remarks to the current day. `None` means all days count.
    pub fn nav_day(&self) -> Option<Day> {
        self.config
            .day_scoped
            .then(|| chrono::Utc::now().date_naive())
    }

    /// Claim the single export slot. Returns `false` when another
    /// export is still running.
    pub fn try_begin_export(&self) -> bool {
        self.export_running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    /// Release the export slot once the spawned export task finishes.
    pub fn finish_export(&self) {
        self.export_running.store(false, Ordering::SeqCst);
    }
}
