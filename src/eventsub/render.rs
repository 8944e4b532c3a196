// ABOUTME: Renders a live announcement from Helix user and stream details
// ABOUTME: Produces the Discord message posted when a broadcaster goes live
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::discord::{DiscordEmbed, DiscordMessage, MentionFlags};
use crate::helix::{TwitchStream, TwitchUser};
use chrono::Utc;
use notifier_core::constants::discord::{EMBED_FOOTER, TWITCH_PURPLE};
use notifier_core::constants::twitch::{
    CHANNEL_URL_PREFIX, THUMBNAIL_PLACEHOLDER, THUMBNAIL_RESOLUTION,
};

/// Everything an announcement shows about a live stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    /// Broadcaster name as shown on Twitch
    pub display_name: String,
    /// Channel login, used for the channel URL
    pub login: String,
    /// Stream title
    pub title: String,
    /// Category being played
    pub game: String,
    /// Thumbnail with the size placeholder already substituted
    pub thumbnail_url: String,
}

impl StreamEvent {
    /// Combine the broadcaster and their current stream
    #[must_use]
    pub fn from_parts(user: &TwitchUser, stream: &TwitchStream) -> Self {
        Self {
            display_name: user.display_name.clone(),
            login: stream
                .user_login
                .clone()
                .unwrap_or_else(|| user.login.clone()),
            title: stream.title.clone(),
            game: stream.game_name.clone(),
            thumbnail_url: stream
                .thumbnail_url
                .replace(THUMBNAIL_PLACEHOLDER, THUMBNAIL_RESOLUTION),
        }
    }

    /// Canonical channel URL
    #[must_use]
    pub fn channel_url(&self) -> String {
        format!("{CHANNEL_URL_PREFIX}{}", self.login)
    }
}

/// Announcement message for `event`
#[must_use]
pub fn render_live_message(event: &StreamEvent) -> DiscordMessage {
    let embed = DiscordEmbed {
        title: event.title.clone(),
        description: format!("Playing: {}", event.game),
        image: Some(event.thumbnail_url.clone()),
        color: TWITCH_PURPLE,
        timestamp: Some(Utc::now().to_rfc3339()),
        footer: Some(EMBED_FOOTER.to_owned()),
        url: Some(event.channel_url()),
    };

    DiscordMessage {
        content: format!("**{}** is now live on Twitch!", event.display_name),
        embeds: vec![embed],
        flags: MentionFlags::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> TwitchUser {
        TwitchUser {
            id: "999".to_owned(),
            login: "somestreamer".to_owned(),
            display_name: "SomeStreamer".to_owned(),
        }
    }

    fn stream(user_login: Option<&str>) -> TwitchStream {
        TwitchStream {
            title: "Speedrunning all day".to_owned(),
            game_name: "Celeste".to_owned(),
            thumbnail_url: "https://static-cdn.jtvnw.net/previews-ttv/live_user_somestreamer-{width}x{height}.jpg"
                .to_owned(),
            user_login: user_login.map(str::to_owned),
        }
    }

    #[test]
    fn test_thumbnail_resolution_substituted() {
        let event = StreamEvent::from_parts(&user(), &stream(None));
        assert!(event.thumbnail_url.ends_with("somestreamer-853x480.jpg"));
        assert!(!event.thumbnail_url.contains("{width}"));
    }

    #[test]
    fn test_login_prefers_stream_login() {
        let event = StreamEvent::from_parts(&user(), &stream(Some("renamed")));
        assert_eq!(event.channel_url(), "https://twitch.tv/renamed");

        let fallback = StreamEvent::from_parts(&user(), &stream(None));
        assert_eq!(fallback.channel_url(), "https://twitch.tv/somestreamer");
    }

    #[test]
    fn test_render_live_message() {
        let message = render_live_message(&StreamEvent::from_parts(&user(), &stream(None)));
        assert_eq!(message.content, "**SomeStreamer** is now live on Twitch!");

        let embed = &message.embeds[0];
        assert_eq!(embed.title, "Speedrunning all day");
        assert_eq!(embed.description, "Playing: Celeste");
        assert_eq!(embed.color, 0x0064_41a5);
        assert_eq!(embed.url.as_deref(), Some("https://twitch.tv/somestreamer"));
        assert_eq!(embed.footer.as_deref(), Some(EMBED_FOOTER));
    }
}
