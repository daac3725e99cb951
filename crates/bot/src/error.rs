use rounds_core::error::CoreError;
use rounds_telegram::TelegramError;

/// Application-level error type for update handlers.
///
/// Wraps [`CoreError`] for domain errors plus the persistence and
/// transport error types. Handler failures are logged by the dispatcher;
/// they never take the process down.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// A domain-level error from `rounds_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A Telegram send or poll error.
    #[error("Telegram error: {0}")]
    Telegram(#[from] TelegramError),
}

/// Convenience type alias for handler return values.
pub type BotResult<T> = Result<T, BotError>;
