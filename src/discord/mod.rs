//! Discord webhook integration.
//!
//! This module sends, edits and deletes webhook messages. It knows nothing
//! about stars, callers hand it ready to send [`WebhookMessage`]s.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), WebhookError> {
//! let client = DiscordWebhookClient::new();
//! let url = "https://discord.com/api/webhooks/1/token";
//! let message_id = client.post_message(url, &WebhookMessage::text("hello".into())).await?;
//! client.delete_message(url, &message_id).await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod destination;
mod message;

use reqwest::StatusCode;
use thiserror::Error;

pub use crate::discord::client::{DiscordWebhookClient, WebhookClient};
#[cfg(test)]
pub use crate::discord::client::MockWebhookClient;
pub use crate::discord::destination::Destination;
pub use crate::discord::message::{WebhookFile, WebhookMessage};

/// Errors returned by webhook requests.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request could not be sent or its response could not be read.
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The message payload could not be serialized.
    #[error("failed to encode webhook message: {0}")]
    Encode(#[from] serde_json::Error),
    /// Discord answered with an unexpected status code.
    #[error("webhook returned status {0}")]
    Status(StatusCode),
    /// Discord accepted the message but returned no message id.
    #[error("webhook response has no message id")]
    MissingId,
}

impl WebhookError {
    /// Whether Discord reported the message or webhook as unknown.
    pub fn is_not_found(&self) -> bool {
        matches!(self, WebhookError::Status(StatusCode::NOT_FOUND))
    }

    /// Whether the same request may succeed later.
    ///
    /// Network failures, rate limits and server errors are retryable. Client
    /// errors such as an invalid webhook token or url are not.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookError::Transport(e) => !e.is_builder(),
            WebhookError::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            WebhookError::Encode(_) | WebhookError::MissingId => false,
        }
    }
}
