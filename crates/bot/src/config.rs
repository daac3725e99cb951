use std::time::Duration;

/// Bot configuration loaded from environment variables.
///
/// Only the bot token and the operations chat are required; everything
/// else has defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot token from @BotFather.
    pub token: String,
    /// Chat receiving registration broadcasts and day exports. Group
    /// chat ids are negative.
    pub ops_chat_id: i64,
    /// SQLite database URL (default: `sqlite://rounds.db`).
    pub database_url: String,
    /// Path to the department/room hierarchy JSON (default: `rooms.json`).
    pub hierarchy_path: String,
    /// When set, menus, counters and room statuses only consider the
    /// current UTC day (default: off, the log is cumulative).
    pub day_scoped: bool,
    /// Pause between exported rooms during a day export.
    pub export_pacing: Duration,
    /// Long-poll window passed to `getUpdates`.
    pub poll_timeout_secs: u64,
}

impl BotConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var              | Required | Default              |
    /// |----------------------|----------|----------------------|
    /// | `TELEGRAM_BOT_TOKEN` | yes      | --                   |
    /// | `OPS_CHAT_ID`        | yes      | --                   |
    /// | `DATABASE_URL`       | no       | `sqlite://rounds.db` |
    /// | `HIERARCHY_PATH`     | no       | `rooms.json`         |
    /// | `DAY_SCOPED_REMARKS` | no       | `false`              |
    /// | `EXPORT_PACING_SECS` | no       | `5`                  |
    /// | `POLL_TIMEOUT_SECS`  | no       | `30`                 |
    pub fn from_env() -> Self {
        let token =
            std::env::var("TELEGRAM_BOT_TOKEN").expect("TELEGRAM_BOT_TOKEN must be set");

        let ops_chat_id: i64 = std::env::var("OPS_CHAT_ID")
            .expect("OPS_CHAT_ID must be set")
            .parse()
            .expect("OPS_CHAT_ID must be a valid i64 chat id");

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://rounds.db".into());

        let hierarchy_path =
            std::env::var("HIERARCHY_PATH").unwrap_or_else(|_| "rooms.json".into());

        let day_scoped = std::env::var("DAY_SCOPED_REMARKS")
            .map(|v| parse_bool(&v))
            .unwrap_or(false);

        let export_pacing_secs: u64 = std::env::var("EXPORT_PACING_SECS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("EXPORT_PACING_SECS must be a valid u64");

        let poll_timeout_secs: u64 = std::env::var("POLL_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("POLL_TIMEOUT_SECS must be a valid u64");

        Self {
            token,
            ops_chat_id,
            database_url,
            hierarchy_path,
            day_scoped,
            export_pacing: Duration::from_secs(export_pacing_secs),
            poll_timeout_secs,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
