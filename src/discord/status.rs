// ABOUTME: Status channel notifications about the bot's own lifecycle
// ABOUTME: Startup, cached token, re-auth required and shutdown messages
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::models::{DiscordEmbed, DiscordMessage, EmbedColor};
use super::webhook::DiscordWebhook;
use notifier_core::constants::discord;
use tracing::{debug, warn};

/// Severity of a status message, shown as the embed color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Normal operation
    Success,
    /// Needs attention (e.g. re-authentication)
    Warning,
    /// The bot is going away
    Error,
}

impl Severity {
    const fn color(self) -> EmbedColor {
        match self {
            Self::Success => EmbedColor::Success,
            Self::Warning => EmbedColor::Warning,
            Self::Error => EmbedColor::Danger,
        }
    }
}

/// Posts bot lifecycle messages to the optional status webhook
#[derive(Debug, Clone)]
pub struct StatusNotifier {
    webhook: Option<DiscordWebhook>,
}

impl StatusNotifier {
    /// Create a status notifier; an empty or invalid URL disables it
    #[must_use]
    pub fn new(url: &str, allow_any_host: bool) -> Self {
        if url.is_empty() {
            debug!("No status webhook configured");
            return Self { webhook: None };
        }

        match DiscordWebhook::branded(url, allow_any_host) {
            Ok(webhook) => Self {
                webhook: Some(webhook),
            },
            Err(e) => {
                warn!("Status webhook disabled: {e}");
                Self { webhook: None }
            }
        }
    }

    /// Notifier that never posts
    #[must_use]
    pub const fn disabled() -> Self {
        Self { webhook: None }
    }

    /// Whether a status webhook is configured
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.webhook.is_some()
    }

    /// Status embed for `message`
    #[must_use]
    pub fn render(message: &str, severity: Severity) -> DiscordMessage {
        DiscordMessage {
            embeds: vec![DiscordEmbed {
                title: discord::STATUS_TITLE.to_owned(),
                description: message.to_owned(),
                footer: Some(discord::EMBED_FOOTER.to_owned()),
                color: severity.color().value(),
                ..DiscordEmbed::default()
            }],
            ..DiscordMessage::default()
        }
    }

    /// Post a status message; failures are logged, never returned
    pub async fn send_status(&self, message: &str, severity: Severity) {
        let Some(webhook) = &self.webhook else {
            return;
        };

        if let Err(e) = webhook.send_rich(&Self::render(message, severity)).await {
            warn!("Failed to send status notification: {e}");
        }
    }
}
