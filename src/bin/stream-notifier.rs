// ABOUTME: Server binary wiring the credential store, worker, session and routes
// ABOUTME: Announces Twitch go-live events on Discord until interrupted
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Stream Notifier Binary
//!
//! Starts the job worker, resumes the session when a cached credential still
//! validates, and serves the login surface until Ctrl-C.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use stream_notifier::{
    config::ServerConfig,
    constants::defaults,
    database::{CredentialStore, SqliteCredentialStore},
    discord::{DiscordWebhook, Severity, StatusNotifier},
    eventsub::EventSession,
    helix::{HelixClient, StreamPlatform},
    jobs::{JobQueue, Worker},
    logging,
    oauth2_client::{OAuthSettings, TokenLifecycle, TwitchOAuthClient},
    routes::{self, AppState},
};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Command-line arguments
#[derive(Parser)]
#[command(name = "stream-notifier")]
#[command(about = "Announce Twitch go-live events on Discord")]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    config: String,

    /// Override HTTP port
    #[arg(long)]
    http_port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    logging::init_from_env()?;

    let mut config = ServerConfig::load(&args.config)?;
    if let Some(http_port) = args.http_port {
        config.http_port = http_port;
    }
    info!("{}", config.summary());
    for key in config.missing_values() {
        warn!("Configuration value {key} is not set");
    }

    ensure_database_dir(&config.database_url).await?;

    let status = StatusNotifier::new(&config.discord.status_webhook, config.debug);
    status.send_status("Starting up!", Severity::Success).await;

    let store: Arc<dyn CredentialStore> =
        Arc::new(SqliteCredentialStore::new(&config.database_url).await?);
    info!("Credential store opened: {}", config.database_url);

    let client = TwitchOAuthClient::new(OAuthSettings::from_config(&config)?);
    let lifecycle = Arc::new(TokenLifecycle::new(client, Arc::clone(&store), config.debug));
    let platform: Arc<dyn StreamPlatform> =
        Arc::new(HelixClient::from_config(Arc::clone(&store), &config));
    let webhook = DiscordWebhook::branded(config.discord.webhook.clone(), config.debug)
        .context("Discord webhook is not usable")?;
    let session = Arc::new(EventSession::new(
        config.twitch.endpoints.websocket.clone(),
        Arc::clone(&platform),
        Arc::new(webhook),
    ));

    let queue = Arc::new(JobQueue::new());
    let _worker = Worker::new(defaults::WORKER_NAME, Arc::clone(&queue)).spawn();

    let config = Arc::new(config);
    let state = AppState {
        lifecycle: Arc::clone(&lifecycle),
        platform,
        queue,
        session,
        config: Arc::clone(&config),
    };

    match lifecycle.validate().await {
        Ok(outcome) if outcome.is_valid() => {
            info!("Found cached token, using!");
            status
                .send_status("Found cached token, using!", Severity::Success)
                .await;
            state.start_session();
        }
        Ok(outcome) => {
            warn!("Cached token unusable: {outcome:?}");
            status
                .send_status(
                    &format!("Auth failed, must reauth!\nVisit: {}", config.hostname),
                    Severity::Warning,
                )
                .await;
        }
        Err(e) => {
            error!("Token validation failed: {e}");
            status
                .send_status(
                    &format!("Auth failed, must reauth!\nVisit: {}", config.hostname),
                    Severity::Warning,
                )
                .await;
        }
    }

    let address = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    info!("Listening on http://{address} (visit {})", config.hostname);

    let served = axum::serve(listener, routes::router(state.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    state.session.request_stop();
    status
        .send_status("Bot has been killed!", Severity::Error)
        .await;
    served.context("HTTP server failed")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

/// Create the parent directory of a file-backed `SQLite` URL
async fn ensure_database_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite:") else {
        return Ok(());
    };
    let path = path.trim_start_matches("//");
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path.contains(":memory:") {
        return Ok(());
    }

    if let Some(parent) = Path::new(path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
    {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    Ok(())
}
