// ABOUTME: Configuration management module for notifier settings
// ABOUTME: Exposes environment-first configuration with JSON file fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration module
//!
//! - **Environment**: server, Twitch and Discord configuration resolved from
//!   `CONFIG_*` environment variables, then `data/config.json`, then defaults

/// Environment and file based configuration
pub mod environment;

pub use environment::{DiscordConfig, ServerConfig, TwitchConfig, TwitchEndpoints};
