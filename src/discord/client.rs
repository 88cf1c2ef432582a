//! HTTP client for Discord webhooks.
//!
//! This module provides the [`DiscordWebhookClient`] which creates, edits and
//! deletes webhook messages.

use log::{debug, info};
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::discord::{WebhookError, message::WebhookMessage};

/// Message returned by Discord when posting with `wait=true`.
#[derive(Deserialize, Debug)]
struct MessageResponse {
    id: String,
}

/// Trait for webhook message operations.
///
/// This trait abstracts the HTTP operations for easier testing with mocks.
#[automock]
pub trait WebhookClient {
    /// Posts a new message and returns its id.
    async fn post_message(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<String, WebhookError>;
    /// Replaces the content of an existing message.
    async fn edit_message(
        &self,
        webhook_url: &str,
        message_id: &str,
        message: &WebhookMessage,
    ) -> Result<(), WebhookError>;
    /// Deletes an existing message.
    async fn delete_message(&self, webhook_url: &str, message_id: &str)
    -> Result<(), WebhookError>;
}

/// Webhook client backed by [`reqwest`].
pub struct DiscordWebhookClient {
    /// HTTP client
    client: Client,
}

impl DiscordWebhookClient {
    /// Create a new [DiscordWebhookClient].
    pub fn new() -> Self {
        DiscordWebhookClient {
            client: Client::new(),
        }
    }

    /// Attaches the message as a JSON body, or as a multipart body when it
    /// carries files.
    fn with_body(
        request: RequestBuilder,
        message: &WebhookMessage,
    ) -> Result<RequestBuilder, WebhookError> {
        if message.is_multipart() {
            Ok(request.multipart(message.to_form()?))
        } else {
            Ok(request.json(message))
        }
    }

    fn message_url(webhook_url: &str, message_id: &str) -> String {
        format!("{}/messages/{}", webhook_url, message_id)
    }
}

impl Default for DiscordWebhookClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WebhookClient for DiscordWebhookClient {
    /// Request `POST {webhook_url}?wait=true`.
    ///
    /// `wait=true` makes Discord answer with the created message, whose `id`
    /// is returned.
    async fn post_message(
        &self,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<String, WebhookError> {
        debug!("post {} -> {:?}", webhook_url, message.content);

        let request = self.client.post(webhook_url).query(&[("wait", "true")]);
        let response = Self::with_body(request, message)?.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(WebhookError::Status(status));
        }

        let posted: MessageResponse = response.json().await?;
        if posted.id.is_empty() {
            return Err(WebhookError::MissingId);
        }

        info!("posted message {} to {}", posted.id, webhook_url);
        Ok(posted.id)
    }

    /// Request `PATCH {webhook_url}/messages/{message_id}`.
    ///
    /// Only `200 OK` and `201 Created` count as success.
    async fn edit_message(
        &self,
        webhook_url: &str,
        message_id: &str,
        message: &WebhookMessage,
    ) -> Result<(), WebhookError> {
        let url = Self::message_url(webhook_url, message_id);
        debug!("patch {} -> {:?}", url, message.content);

        let request = self.client.patch(&url);
        let response = Self::with_body(request, message)?.send().await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                info!("edited message {} on {}", message_id, webhook_url);
                Ok(())
            }
            status => Err(WebhookError::Status(status)),
        }
    }

    /// Request `DELETE {webhook_url}/messages/{message_id}`.
    ///
    /// Only `204 No Content` counts as success.
    async fn delete_message(
        &self,
        webhook_url: &str,
        message_id: &str,
    ) -> Result<(), WebhookError> {
        let url = Self::message_url(webhook_url, message_id);
        debug!("delete {}", url);

        let response = self.client.delete(&url).send().await?;

        match response.status() {
            StatusCode::NO_CONTENT => {
                info!("deleted message {} on {}", message_id, webhook_url);
                Ok(())
            }
            status => Err(WebhookError::Status(status)),
        }
    }
}
