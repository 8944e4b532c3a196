// ABOUTME: Discord webhook notifier for go-live announcements and bot status
// ABOUTME: Message/embed models, the webhook client and the Notifier trait
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Discord
//!
//! The event session hands a rendered [`DiscordMessage`] to a [`Notifier`].
//! Delivery failures are reported back but never end the session.

mod models;
mod status;
mod webhook;

pub use models::{DiscordEmbed, DiscordMessage, EmbedColor, MentionFlags};
pub use status::{Severity, StatusNotifier};
pub use webhook::DiscordWebhook;

use async_trait::async_trait;
use notifier_core::errors::AppResult;

/// Renders and delivers an outbound chat message
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`; `Ok` means the endpoint acknowledged it
    async fn deliver(&self, message: &DiscordMessage) -> AppResult<()>;
}
