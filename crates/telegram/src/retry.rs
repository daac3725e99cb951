//! Rate-limit aware send retry with exponential backoff.
//!
//! Telegram throttles bots that send too fast. [`send_with_retry`] keeps
//! re-running an operation while it fails with a rate-limit class error,
//! sleeping between attempts. The pause doubles each time up to a cap,
//! and never undercuts the server's `retry_after` hint. Any other error
//! propagates immediately.

use std::future::Future;
use std::time::Duration;

use crate::api::TelegramError;

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Attempt budget, including the first try.
    pub max_attempts: u32,
    /// Pause before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the pause between attempts.
    pub max_delay: Duration,
    /// Factor by which the pause grows after each failure.
    pub multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 500,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}

/// The pause actually taken: the scheduled delay, floored by the server's
/// `retry_after` hint when one is present.
fn floor_to_hint(delay: Duration, error: &TelegramError) -> Duration {
    delay.max(error.retry_after().unwrap_or(Duration::ZERO))
}

/// Run `op` until it succeeds, fails permanently or exhausts the budget.
pub async fn send_with_retry<T, F, Fut>(
    config: &RetryConfig,
    mut op: F,
) -> Result<T, TelegramError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TelegramError>>,
{
    let mut delay = config.initial_delay;
    let mut attempt = 1u32;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_rate_limited() && attempt < config.max_attempts => {
                let pause = floor_to_hint(delay, &e);
                tracing::warn!(
                    attempt,
                    pause_ms = pause.as_millis() as u64,
                    error = %e,
                    "Rate limited, backing off"
                );
                tokio::time::sleep(pause).await;
                delay = next_delay(delay, config);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
