// ABOUTME: Discord message and embed models with JSON rendering
// ABOUTME: Allowed-mention flags map onto the allowed_mentions.parse array
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use bitflags::bitflags;
use notifier_core::constants::discord;
use serde_json::{json, Map, Value};

/// Embed color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedColor {
    /// Blue
    Primary,
    /// Grey
    Secondary,
    /// Green
    Success,
    /// Red
    Danger,
    /// Amber
    Warning,
    /// Teal
    Info,
    /// Light grey
    Light,
    /// Near black
    Dark,
    /// Twitch brand purple
    Twitch,
}

impl EmbedColor {
    /// Color as the integer Discord expects
    #[must_use]
    pub const fn value(self) -> u32 {
        match self {
            Self::Primary => 0x0000_69d9,
            Self::Secondary => 0x005a_6268,
            Self::Success => 0x0021_8838,
            Self::Danger => 0x00c8_2333,
            Self::Warning => 0x00e0_a800,
            Self::Info => 0x0013_8496,
            Self::Light => 0x00e2_e6ea,
            Self::Dark => 0x0023_272b,
            Self::Twitch => discord::TWITCH_PURPLE,
        }
    }
}

bitflags! {
    /// Which mentions a message may ping
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MentionFlags: u16 {
        /// Ping nobody, even if the content contains mentions
        const SILENT = 0x0001;
        /// Allow role mentions
        const ROLES = 0x0010;
        /// Allow user mentions
        const USERS = 0x0100;
        /// Allow `@everyone`/`@here`
        const EVERYONE = 0x1000;
    }
}

impl MentionFlags {
    /// `allowed_mentions` object, or `None` when Discord defaults apply
    #[must_use]
    pub fn allowed_mentions(self) -> Option<Value> {
        if self.is_empty() {
            return None;
        }

        let mut parse = Vec::new();
        if self.contains(Self::ROLES) {
            parse.push("roles");
        }
        if self.contains(Self::USERS) {
            parse.push("users");
        }
        if self.contains(Self::EVERYONE) {
            parse.push("everyone");
        }
        Some(json!({ "parse": parse }))
    }
}

/// Rich embed attached to a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscordEmbed {
    /// Bold heading
    pub title: String,
    /// Body text
    pub description: String,
    /// Large image URL
    pub image: Option<String>,
    /// Side bar color
    pub color: u32,
    /// ISO-8601 timestamp shown in the footer
    pub timestamp: Option<String>,
    /// Footer text
    pub footer: Option<String>,
    /// Link on the title
    pub url: Option<String>,
}

impl Default for DiscordEmbed {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            image: None,
            color: EmbedColor::Primary.value(),
            timestamp: None,
            footer: None,
            url: None,
        }
    }
}

impl DiscordEmbed {
    /// JSON representation for the webhook API
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut embed = Map::new();
        embed.insert("title".into(), Value::String(self.title.clone()));
        embed.insert(
            "description".into(),
            Value::String(self.description.clone()),
        );
        embed.insert("color".into(), json!(self.color));
        if let Some(timestamp) = &self.timestamp {
            embed.insert("timestamp".into(), Value::String(timestamp.clone()));
        }
        if let Some(url) = &self.url {
            embed.insert("url".into(), Value::String(url.clone()));
        }
        if let Some(image) = &self.image {
            embed.insert("image".into(), json!({ "url": image }));
        }
        if let Some(footer) = &self.footer {
            embed.insert("footer".into(), json!({ "text": footer }));
        }
        Value::Object(embed)
    }
}

/// Message posted through a webhook
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscordMessage {
    /// Plain text content
    pub content: String,
    /// Attached embeds
    pub embeds: Vec<DiscordEmbed>,
    /// Allowed mentions
    pub flags: MentionFlags,
}

impl DiscordMessage {
    /// Text-only message
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Whether there is nothing to send
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.embeds.is_empty()
    }

    /// JSON representation for the webhook API
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut message = json!({
            "content": self.content,
            "embeds": self.embeds.iter().map(DiscordEmbed::to_json).collect::<Vec<_>>(),
        });
        if let (Some(allowed), Some(object)) =
            (self.flags.allowed_mentions(), message.as_object_mut())
        {
            object.insert("allowed_mentions".into(), allowed);
        }
        message
    }
}
