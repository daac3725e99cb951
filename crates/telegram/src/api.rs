//! HTTP client for the Telegram Bot API.
//!
//! Every Bot API method returns a JSON envelope `{ ok, result | error }`.
//! [`TelegramApi`] posts method calls, decodes the envelope and surfaces
//! failures as [`TelegramError`], keeping the rate-limit hint
//! (`parameters.retry_after`) the retry layer needs.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::types::{InputMediaPhoto, Message, ReplyMarkup, Update, User};

const API_BASE: &str = "https://api.telegram.org";

/// Per-request timeout. Must exceed the long-poll window passed to
/// `getUpdates` or the client would abort every idle poll.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// The Bot API status code for rate limiting.
const TOO_MANY_REQUESTS: i64 = 429;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the Telegram Bot API layer.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Telegram answered with `ok: false`.
    #[error("Telegram API error ({error_code}): {description}")]
    Api {
        error_code: i64,
        description: String,
        /// Seconds to wait, present on rate-limit responses.
        retry_after: Option<u64>,
    },

    /// The response body did not match the expected envelope shape.
    #[error("Malformed API response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl TelegramError {
    /// Failures worth retrying after a pause. Everything else is treated
    /// as permanent by callers.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            Self::Api {
                error_code,
                retry_after,
                ..
            } => *error_code == TOO_MANY_REQUESTS || retry_after.is_some(),
            _ => false,
        }
    }

    /// Server-requested minimum pause before retrying.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Api {
                retry_after: Some(secs),
                ..
            } => Some(Duration::from_secs(*secs)),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    ok: bool,
    #[serde(default)]
    result: serde_json::Value,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Decode a raw response body into the expected result type.
fn decode_envelope<T: DeserializeOwned>(body: &str) -> Result<T, TelegramError> {
    let envelope: ApiEnvelope = serde_json::from_str(body)?;
    if envelope.ok {
        return Ok(serde_json::from_value(envelope.result)?);
    }
    Err(TelegramError::Api {
        error_code: envelope.error_code.unwrap_or(0),
        description: envelope
            .description
            .unwrap_or_else(|| "no description".to_string()),
        retry_after: envelope.parameters.and_then(|p| p.retry_after),
    })
}

// ---------------------------------------------------------------------------
// TelegramApi
// ---------------------------------------------------------------------------

/// HTTP client bound to one bot token.
pub struct TelegramApi {
    client: reqwest::Client,
    /// `https://api.telegram.org/bot<token>`, no trailing slash.
    base_url: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> Self {
        Self::with_base(API_BASE, token)
    }

    /// Create a client against a non-standard API server (local Bot API
    /// server, test double).
    pub fn with_base(base: &str, token: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build reqwest HTTP client");
        Self {
            client,
            base_url: format!("{}/bot{}", base.trim_end_matches('/'), token),
        }
    }

    /// Identify the bot account. Used as a startup connectivity check.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`, waiting up to `timeout_secs`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let mut body = serde_json::json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            body["offset"] = serde_json::json!(offset);
        }
        self.call("getUpdates", body).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&ReplyMarkup>,
    ) -> Result<Message, TelegramError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = serde_json::to_value(markup)?;
        }
        self.call("sendMessage", body).await
    }

    /// Send a previously uploaded photo by file id.
    pub async fn send_photo(
        &self,
        chat_id: i64,
        file_id: &str,
        caption: Option<&str>,
    ) -> Result<Message, TelegramError> {
        let mut body = serde_json::json!({
            "chat_id": chat_id,
            "photo": file_id,
        });
        if let Some(caption) = caption {
            body["caption"] = serde_json::json!(caption);
        }
        self.call("sendPhoto", body).await
    }

    /// Send an album of 2 to 10 photos.
    pub async fn send_media_group(
        &self,
        chat_id: i64,
        media: &[InputMediaPhoto],
    ) -> Result<Vec<Message>, TelegramError> {
        let body = serde_json::json!({
            "chat_id": chat_id,
            "media": media,
        });
        self.call("sendMediaGroup", body).await
    }

    /// Stop the client-side loading spinner on an inline button press.
    pub async fn answer_callback_query(&self, query_id: &str) -> Result<bool, TelegramError> {
        let body = serde_json::json!({
            "callback_query_id": query_id,
        });
        self.call("answerCallbackQuery", body).await
    }

    // ---- private helpers ----

    /// POST one Bot API method call and decode the response envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, method))
            .json(&body)
            .send()
            .await?;
        let text = response.text().await?;
        decode_envelope(&text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
