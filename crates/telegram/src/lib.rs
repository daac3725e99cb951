//! Telegram Bot API client library.
//!
//! Provides the wire types this bot touches, long-poll update retrieval,
//! send methods with typed errors, classification of raw updates into
//! inbound events, and rate-limit aware retry helpers.

pub mod api;
pub mod inbound;
pub mod retry;
pub mod types;

pub use api::{TelegramApi, TelegramError};
pub use inbound::{classify, InboundEvent, InboundKind};
pub use retry::{send_with_retry, RetryConfig};
