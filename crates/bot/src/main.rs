//! `rounds-bot` -- guided inspection rounds over Telegram.
//!
//! Registers inspectors, walks them through a department/room hierarchy
//! with inline menus, records text and photo remarks per room and exports
//! the day's findings to an operations channel.
//!
//! # Environment variables
//!
//! | Variable             | Required | Default              | Description                                  |
//! |----------------------|----------|----------------------|----------------------------------------------|
//! | `TELEGRAM_BOT_TOKEN` | yes      | --                   | Bot token from @BotFather                    |
//! | `OPS_CHAT_ID`        | yes      | --                   | Chat receiving reports (groups are negative) |
//! | `DATABASE_URL`       | no       | `sqlite://rounds.db` | SQLite database URL                          |
//! | `HIERARCHY_PATH`     | no       | `rooms.json`         | Department/room hierarchy JSON file          |
//! | `DAY_SCOPED_REMARKS` | no       | `false`              | Scope menus and counters to the current day  |
//! | `EXPORT_PACING_SECS` | no       | `5`                  | Pause between exported rooms                 |
//! | `POLL_TIMEOUT_SECS`  | no       | `30`                 | Long-poll window for `getUpdates`            |

use std::path::Path;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rounds_bot::config::BotConfig;
use rounds_bot::dispatch;
use rounds_bot::outbound::TelegramOutbound;
use rounds_bot::state::AppState;
use rounds_core::Hierarchy;
use rounds_telegram::{RetryConfig, TelegramApi};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "rounds_bot=info,rounds_db=info,rounds_telegram=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = BotConfig::from_env();
    tracing::info!(
        ops_chat_id = config.ops_chat_id,
        day_scoped = config.day_scoped,
        "Loaded bot configuration"
    );

    // --- Database ---
    let pool = rounds_db::create_pool(&config.database_url)
        .await
        .expect("Failed to open the database");
    tracing::info!("Database connection pool created");

    rounds_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    rounds_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Hierarchy ---
    let hierarchy = Hierarchy::load(Path::new(&config.hierarchy_path))
        .unwrap_or_else(|e| panic!("Invalid hierarchy file '{}': {e}", config.hierarchy_path));
    tracing::info!(
        departments = hierarchy.departments().len(),
        rooms = hierarchy.room_count(),
        "Hierarchy loaded"
    );

    // --- Telegram ---
    let api = Arc::new(TelegramApi::new(&config.token));
    let me = api
        .get_me()
        .await
        .expect("Failed to reach the Telegram Bot API");
    tracing::info!(bot = %me.first_name, username = ?me.username, "Connected to Telegram");

    let outbound = Arc::new(TelegramOutbound::new(
        Arc::clone(&api),
        RetryConfig::default(),
    ));

    // --- App state ---
    let state = AppState::new(pool, Arc::new(hierarchy), outbound, Arc::new(config));

    // --- Shutdown wiring ---
    let cancel = tokio_util::sync::CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        signal_cancel.cancel();
    });

    dispatch::run(state, api, cancel).await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the bot stops
/// cleanly whether interrupted interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
