// ABOUTME: Discord webhook client posting, editing and deleting messages
// ABOUTME: Validates the webhook URL and implements the Notifier trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::DiscordMessage;
use super::Notifier;
use crate::utils::http_client::api_client;
use async_trait::async_trait;
use notifier_core::constants::discord;
use notifier_core::errors::{AppError, AppResult};
use reqwest::Response;
use serde_json::Value;
use tracing::{debug, error};

/// Client for a single Discord webhook
#[derive(Debug, Clone)]
pub struct DiscordWebhook {
    url: String,
    name: String,
    avatar_url: String,
    client: reqwest::Client,
}

impl DiscordWebhook {
    /// Create a webhook client.
    ///
    /// `allow_any_host` accepts any `http(s)` URL so local mocks can stand in
    /// for Discord in debug mode.
    ///
    /// # Errors
    ///
    /// Returns an invalid input error for an empty URL or one outside
    /// `https://discord.com/api/webhooks`
    pub fn new(
        url: impl Into<String>,
        name: impl Into<String>,
        avatar_url: impl Into<String>,
        allow_any_host: bool,
    ) -> AppResult<Self> {
        let url = url.into();
        if url.is_empty() {
            return Err(AppError::invalid_input("Webhook URL is empty"));
        }

        let accepted = url.starts_with(discord::WEBHOOK_BASE)
            || (allow_any_host && (url.starts_with("http://") || url.starts_with("https://")));
        if !accepted {
            return Err(AppError::invalid_input(format!(
                "Not a Discord webhook URL: {url}"
            )));
        }

        Ok(Self {
            url,
            name: name.into(),
            avatar_url: avatar_url.into(),
            client: api_client(),
        })
    }

    /// Webhook posting as "Twitch Notifier" with the bot avatar
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is rejected
    pub fn branded(url: impl Into<String>, allow_any_host: bool) -> AppResult<Self> {
        Self::new(
            url,
            discord::WEBHOOK_NAME,
            discord::WEBHOOK_AVATAR,
            allow_any_host,
        )
    }

    /// Post a text-only message
    ///
    /// # Errors
    ///
    /// Same as [`Self::send_rich`]
    pub async fn send_plain(&self, content: &str) -> AppResult<String> {
        self.send_rich(&DiscordMessage::plain(content)).await
    }

    /// Post a message and return the id Discord assigned to it
    ///
    /// # Errors
    ///
    /// Returns an invalid input error for an empty message, and an external
    /// service error when Discord answers with a non-success status or no id
    pub async fn send_rich(&self, message: &DiscordMessage) -> AppResult<String> {
        if message.is_empty() {
            error!("Cannot send empty webhook!");
            return Err(AppError::invalid_input("Cannot send empty webhook message"));
        }

        let mut body = message.to_json();
        if let Some(object) = body.as_object_mut() {
            object.insert("username".into(), Value::String(self.name.clone()));
            object.insert("avatar_url".into(), Value::String(self.avatar_url.clone()));
        }

        let response = self
            .client
            .post(&self.url)
            .query(&[("wait", "true")])
            .json(&body)
            .send()
            .await?;

        let echoed = Self::checked_json(response, "send").await?;
        let id = echoed
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| AppError::missing_field("id"))?
            .to_owned();
        debug!("Posted Discord message {id}");
        Ok(id)
    }

    /// Replace the content of a previously posted message
    ///
    /// # Errors
    ///
    /// Returns an external service error on a non-success status
    pub async fn update(&self, message_id: &str, message: &DiscordMessage) -> AppResult<Value> {
        let response = self
            .client
            .patch(format!("{}/messages/{message_id}", self.url))
            .json(&message.to_json())
            .send()
            .await?;

        Self::checked_json(response, "update").await
    }

    /// Delete a previously posted message
    ///
    /// # Errors
    ///
    /// Returns an external service error on a non-success status
    pub async fn delete(&self, message_id: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(format!("{}/messages/{message_id}", self.url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::external_service(
                "discord",
                format!("delete failed with status {}", status.as_u16()),
            ));
        }
        Ok(())
    }

    async fn checked_json(response: Response, operation: &str) -> AppResult<Value> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                "Discord webhook {operation} failed with code {}!",
                status.as_u16()
            );
            return Err(AppError::external_service(
                "discord",
                format!("{operation} failed with status {}: {body}", status.as_u16()),
            ));
        }
        Ok(response.json().await?)
    }
}

#[async_trait]
impl Notifier for DiscordWebhook {
    async fn deliver(&self, message: &DiscordMessage) -> AppResult<()> {
        self.send_rich(message).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notifier_core::errors::ErrorCode;

    #[test]
    fn test_rejects_empty_url() {
        let error = DiscordWebhook::branded("", false).unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }

    #[test]
    fn test_rejects_foreign_host() {
        let foreign = "https://example.com/hook";
        assert!(DiscordWebhook::branded(foreign, false).is_err());
        assert!(DiscordWebhook::branded(foreign, true).is_ok());
        assert!(DiscordWebhook::branded("ftp://example.com/hook", true).is_err());
    }

    #[test]
    fn test_accepts_discord_url() {
        assert!(
            DiscordWebhook::branded("https://discord.com/api/webhooks/1/token", false).is_ok()
        );
    }

    #[tokio::test]
    async fn test_empty_message_is_refused() {
        let hook = DiscordWebhook::branded("https://discord.com/api/webhooks/1/t", false).unwrap();
        let empty = DiscordMessage::default();
        let error = hook.send_rich(&empty).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::InvalidInput);
    }
}
