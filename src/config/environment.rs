// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Resolves keys from CONFIG_* env vars first, then the JSON config file, then defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration management
//!
//! Every configuration key is a dotted path such as `discord.webhook`. The
//! value is looked up, in order:
//!
//! 1. the environment variable `CONFIG_` + upper-cased key with dots replaced
//!    by underscores (`CONFIG_DISCORD_WEBHOOK`), so containers can override
//!    anything without a file
//! 2. the JSON config file, walking the dotted path
//! 3. the built-in default

use anyhow::{Context, Result};
use notifier_core::constants::{defaults, twitch};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};
use url::Url;

/// Twitch endpoint set, switched wholesale between production and local mocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwitchEndpoints {
    /// `EventSub` WebSocket URL
    pub websocket: String,
    /// Helix REST base
    pub helix: String,
    /// Identity provider base (`/token`, `/validate`, `/authorize`)
    pub auth: String,
    /// Base for `/eventsub/subscriptions`
    pub eventsub: String,
}

impl TwitchEndpoints {
    /// Real Twitch endpoints
    #[must_use]
    pub fn production() -> Self {
        Self {
            websocket: twitch::WEBSOCKET_URL.to_owned(),
            helix: twitch::HELIX_URL.to_owned(),
            auth: twitch::AUTH_URL.to_owned(),
            eventsub: twitch::HELIX_URL.to_owned(),
        }
    }

    /// Endpoints served by the Twitch CLI mock server
    #[must_use]
    pub fn debug() -> Self {
        Self {
            websocket: twitch::DEBUG_WEBSOCKET_URL.to_owned(),
            helix: twitch::DEBUG_HELIX_URL.to_owned(),
            auth: twitch::DEBUG_AUTH_URL.to_owned(),
            eventsub: twitch::DEBUG_EVENTSUB_URL.to_owned(),
        }
    }
}

/// Twitch application credentials and endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwitchConfig {
    /// Application client id
    pub client_id: String,
    /// Application client secret
    pub client_secret: String,
    /// Endpoint set in use
    pub endpoints: TwitchEndpoints,
}

/// Discord webhook targets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Webhook receiving go-live announcements
    pub webhook: String,
    /// Webhook receiving bot status messages (optional)
    pub status_webhook: String,
}

/// Complete notifier configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Public base URL of this service, used to build the OAuth redirect
    pub hostname: String,
    /// Port the trigger surface listens on
    pub http_port: u16,
    /// Credential store connection string
    pub database_url: String,
    /// Debug mode: mock endpoints, debug token grant, `/debug-get-token`
    pub debug: bool,
    /// Discord settings
    pub discord: DiscordConfig,
    /// Twitch settings
    pub twitch: TwitchConfig,
}

impl ServerConfig {
    /// Load configuration using only the environment and defaults
    ///
    /// # Errors
    ///
    /// Returns an error if `HTTP_PORT` is set but is not a valid port
    pub fn from_env() -> Result<Self> {
        Self::from_sources(None)
    }

    /// Load configuration from the environment and the JSON file at `path`.
    ///
    /// A missing file is not an error; every key then falls back to its
    /// environment override or default.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            let parsed: Value = serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?;
            Some(parsed)
        } else {
            debug!(
                "Config file {} not found, using environment",
                path.display()
            );
            None
        };

        Self::from_sources(file.as_ref())
    }

    fn from_sources(file: Option<&Value>) -> Result<Self> {
        let debug = env::var("DEBUG").is_ok_and(|v| !v.is_empty());

        let http_port = match env::var("HTTP_PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("Invalid HTTP_PORT value: {port}"))?,
            Err(_) => defaults::HTTP_PORT,
        };

        let endpoints = if debug {
            warn!("Using debug Twitch endpoints!");
            TwitchEndpoints::debug()
        } else {
            TwitchEndpoints::production()
        };

        let config = Self {
            hostname: resolve_value(file, "hostname", defaults::HOSTNAME),
            http_port,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| defaults::DATABASE_URL.to_owned()),
            debug,
            discord: DiscordConfig {
                webhook: resolve_value(file, "discord.webhook", ""),
                status_webhook: resolve_value(file, "discord.status_webhook", ""),
            },
            twitch: TwitchConfig {
                client_id: resolve_value(file, "twitch.clientid", ""),
                client_secret: resolve_value(file, "twitch.secret", ""),
                endpoints,
            },
        };

        if debug {
            debug!("Loaded configuration: {}", config.summary());
        }

        Ok(config)
    }

    /// OAuth redirect URI: the hostname joined with `callback`
    ///
    /// # Errors
    ///
    /// Returns an error if the hostname is not a valid URL
    pub fn redirect_uri(&self) -> Result<String> {
        let base = Url::parse(&self.hostname)
            .with_context(|| format!("Invalid hostname: {}", self.hostname))?;
        let joined = base
            .join("callback")
            .context("Failed to build OAuth redirect URI")?;
        Ok(joined.to_string())
    }

    /// Names of required values that are empty
    #[must_use]
    pub fn missing_values(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.twitch.client_id.is_empty() {
            missing.push("twitch.clientid");
        }
        if self.twitch.client_secret.is_empty() {
            missing.push("twitch.secret");
        }
        if self.discord.webhook.is_empty() {
            missing.push("discord.webhook");
        }
        missing
    }

    /// Log-safe description of the configuration (secrets are never included)
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "hostname={} http_port={} database={} debug={} twitch_client_id={} twitch_secret={} discord_webhook={} status_webhook={}",
            self.hostname,
            self.http_port,
            self.database_url,
            self.debug,
            presence(&self.twitch.client_id),
            presence(&self.twitch.client_secret),
            presence(&self.discord.webhook),
            presence(&self.discord.status_webhook),
        )
    }
}

const fn presence(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<set>"
    }
}

/// Environment variable name overriding a dotted configuration key
#[must_use]
pub fn env_key(key: &str) -> String {
    format!(
        "{}{}",
        defaults::CONFIG_ENV_PREFIX,
        key.to_uppercase().replace('.', "_")
    )
}

/// Resolve a dotted key: environment first, then the file, then `default`
#[must_use]
pub fn resolve_value(file: Option<&Value>, key: &str, default: &str) -> String {
    if let Ok(value) = env::var(env_key(key)) {
        return value;
    }

    file.and_then(|root| lookup_path(root, key))
        .unwrap_or_else(|| default.to_owned())
}

fn lookup_path(root: &Value, key: &str) -> Option<String> {
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    match current {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_env_key_format() {
        assert_eq!(env_key("discord.webhook"), "CONFIG_DISCORD_WEBHOOK");
        assert_eq!(env_key("hostname"), "CONFIG_HOSTNAME");
    }

    #[test]
    fn test_lookup_nested_path() {
        let file = json!({"twitch": {"clientid": "abc", "port": 42}});
        assert_eq!(
            lookup_path(&file, "twitch.clientid").as_deref(),
            Some("abc")
        );
        assert_eq!(lookup_path(&file, "twitch.port").as_deref(), Some("42"));
        assert_eq!(lookup_path(&file, "twitch.secret"), None);
        assert_eq!(lookup_path(&file, "discord.webhook"), None);
    }

    #[test]
    fn test_endpoint_sets_differ() {
        let prod = TwitchEndpoints::production();
        assert_eq!(prod.eventsub, prod.helix);
        assert!(prod.websocket.starts_with("wss://"));
        let debug = TwitchEndpoints::debug();
        assert!(debug.websocket.starts_with("ws://127.0.0.1"));
    }
}
