// ABOUTME: Long-lived EventSub WebSocket session state machine
// ABOUTME: Connect, subscribe to stream.online, listen until stopped or closed
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Event Session
//!
//! A run walks `Connecting -> Subscribed -> Listening -> Closed`. Any state
//! can fall through to `Closed` on a socket error or a stop request.
//!
//! Runs are started by pushing the [`Job`] returned from
//! [`EventSession::start_job`] onto the job queue, so a run occupies the
//! worker for as long as it listens. Stopping is cooperative: every job
//! handed out since the last stop shares one [`CancellationToken`], which
//! [`EventSession::request_stop`] cancels. The listening loop races the token
//! against a receive bounded by the polling interval, so a stop is observed
//! at the latest one interval after it is requested. Opening the socket is
//! raced against the same token and bounded by a connect timeout, so a
//! stalled handshake never pins the worker. A stop that arrives before the
//! queued run begins is seen before the socket is opened, and a fresh token
//! is minted for the next login.

use super::messages::{EventSubMessage, MessageKind};
use super::render::{render_live_message, StreamEvent};
use crate::discord::Notifier;
use crate::helix::{StreamPlatform, SubscriptionRequest, TwitchUser};
use crate::jobs::Job;
use futures_util::stream::{SplitStream, StreamExt};
use futures_util::SinkExt;
use notifier_core::constants::timing::{POLL_INTERVAL, WEBSOCKET_CONNECT_TIMEOUT};
use notifier_core::errors::{AppError, AppResult, ErrorCode};
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::error::ProtocolError;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

type SocketReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

/// Where the current (or last) run is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No run has started yet
    Disconnected,
    /// Opening the socket and waiting for the welcome
    Connecting,
    /// Resolving the user and requesting the subscription
    Subscribed,
    /// Receiving notifications
    Listening,
    /// The last run ended
    Closed,
}

impl SessionState {
    /// Lowercase name used in logs and the health report
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Subscribed => "subscribed",
            Self::Listening => "listening",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a frame read while listening affects the run
enum Flow {
    Continue,
    Finished,
}

/// The `EventSub` WebSocket session
pub struct EventSession {
    websocket_url: String,
    platform: Arc<dyn StreamPlatform>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    connect_timeout: Duration,
    state: watch::Sender<SessionState>,
    stop: Mutex<CancellationToken>,
    running: tokio::sync::Mutex<()>,
}

impl EventSession {
    /// Session connecting to `websocket_url`
    pub fn new(
        websocket_url: impl Into<String>,
        platform: Arc<dyn StreamPlatform>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Disconnected);
        Self {
            websocket_url: websocket_url.into(),
            platform,
            notifier,
            poll_interval: POLL_INTERVAL,
            connect_timeout: WEBSOCKET_CONNECT_TIMEOUT,
            state,
            stop: Mutex::new(CancellationToken::new()),
            running: tokio::sync::Mutex::new(()),
        }
    }

    /// Override the receive bound used while listening
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Override the bound on opening the socket
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Watch state transitions
    #[must_use]
    pub fn state(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Current state
    #[must_use]
    pub fn current_state(&self) -> SessionState {
        *self.state.borrow()
    }

    fn set_state(&self, state: SessionState) {
        debug!("Event session state: {state}");
        self.state.send_replace(state);
    }

    /// Token the next queued run will observe; replaced once cancelled
    fn run_token(&self) -> CancellationToken {
        let mut stop = self.stop.lock().unwrap_or_else(PoisonError::into_inner);
        if stop.is_cancelled() {
            *stop = CancellationToken::new();
        }
        stop.clone()
    }

    /// Job that performs one run, for the job queue
    #[must_use]
    pub fn start_job(self: &Arc<Self>) -> Job {
        let session = Arc::clone(self);
        let stop = self.run_token();
        Job::new("event session", move || async move {
            session.run(stop).await;
        })
    }

    /// Ask the running session, and any queued run, to stop. Safe to call at
    /// any time, any number of times.
    pub fn request_stop(&self) {
        info!("Stopping event session...");
        self.stop
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .cancel();
    }

    /// Perform one run until `stop` is cancelled or the connection ends.
    ///
    /// Never fails: errors are logged and end the run in `Closed`. A call
    /// made while another run is active returns immediately.
    pub async fn run(&self, stop: CancellationToken) {
        let Ok(_running) = self.running.try_lock() else {
            warn!("Event session already running, ignoring start");
            return;
        };

        if stop.is_cancelled() {
            info!("Stop requested before the event session started");
            self.set_state(SessionState::Closed);
            return;
        }

        match self.connect_and_listen(&stop).await {
            Ok(()) => info!("Event session closed"),
            Err(e) => error!("Event session failed: {e}"),
        }
        self.set_state(SessionState::Closed);
    }

    async fn connect_and_listen(&self, stop: &CancellationToken) -> AppResult<()> {
        self.set_state(SessionState::Connecting);
        info!("Connecting to {}", self.websocket_url);
        let handshake = connect_async(self.websocket_url.as_str());
        let connect = timeout(self.connect_timeout, handshake);
        let (socket, _) = tokio::select! {
            biased;
            () = stop.cancelled() => {
                info!("Stop requested while connecting, closing event session");
                return Ok(());
            }
            connected = connect => connected.map_err(|_| {
                AppError::transport(format!(
                    "Timed out connecting to {} after {}s",
                    self.websocket_url,
                    self.connect_timeout.as_secs()
                ))
            })??,
        };
        let (mut write, mut read) = socket.split();

        let Some(session_id) = Self::read_welcome(&mut read, stop).await? else {
            return Ok(());
        };
        info!("EventSub session {session_id} established");

        self.set_state(SessionState::Subscribed);
        let Some(user) = self.platform.current_user().await? else {
            error!("Could not resolve the logged in user, closing event session");
            return Ok(());
        };
        self.subscribe(&session_id, &user).await;

        self.set_state(SessionState::Listening);
        info!("Listening for {} going live...", user.display_name);
        loop {
            let frame = tokio::select! {
                biased;
                () = stop.cancelled() => {
                    info!("Stop requested, closing event session");
                    if let Err(e) = write.send(Message::Close(None)).await {
                        debug!("Close frame not sent: {e}");
                    }
                    return Ok(());
                }
                frame = timeout(self.poll_interval, read.next()) => frame,
            };

            // Silence for a whole interval is the cancellation checkpoint
            let Ok(frame) = frame else {
                continue;
            };

            if let Flow::Finished = self.handle_frame(&user, frame).await? {
                return Ok(());
            }
        }
    }

    /// Wait for the welcome and return its session id; `None` when stopped
    async fn read_welcome(
        read: &mut SocketReader,
        stop: &CancellationToken,
    ) -> AppResult<Option<String>> {
        loop {
            let frame = tokio::select! {
                biased;
                () = stop.cancelled() => return Ok(None),
                frame = read.next() => frame,
            };

            match frame {
                Some(Ok(Message::Text(text))) => {
                    let message = EventSubMessage::parse(&text)?;
                    return message
                        .welcome_session_id()
                        .map(|id| Some(id.to_owned()))
                        .ok_or_else(|| {
                            AppError::new(
                                ErrorCode::InvalidFormat,
                                format!(
                                    "expected session_welcome, got {}",
                                    message.metadata.message_type
                                ),
                            )
                        });
                }
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => {
                    return Err(AppError::transport("connection closed before welcome"));
                }
                Some(Ok(other)) => {
                    return Err(AppError::new(
                        ErrorCode::InvalidFormat,
                        format!("unexpected frame before welcome: {other:?}"),
                    ));
                }
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Request `stream.online` for `user`. Rejection is not fatal: the
    /// session keeps listening.
    async fn subscribe(&self, session_id: &str, user: &TwitchUser) {
        let request = SubscriptionRequest::stream_online(session_id, &user.id);
        match self.platform.create_subscription(&request).await {
            Ok(true) => info!("Subscribed to stream.online for {}", user.login),
            Ok(false) => warn!("stream.online subscription was not accepted, listening anyway"),
            Err(e) => warn!("stream.online subscription failed: {e}, listening anyway"),
        }
    }

    async fn handle_frame(
        &self,
        user: &TwitchUser,
        frame: Option<Result<Message, WsError>>,
    ) -> AppResult<Flow> {
        match frame {
            Some(Ok(Message::Text(text))) => {
                self.handle_message(user, &text).await;
                Ok(Flow::Continue)
            }
            Some(Ok(Message::Close(frame))) => {
                info!("EventSub closed the connection: {frame:?}");
                Ok(Flow::Finished)
            }
            Some(Ok(_)) => Ok(Flow::Continue),
            None
            | Some(Err(
                WsError::ConnectionClosed
                | WsError::AlreadyClosed
                | WsError::Protocol(ProtocolError::ResetWithoutClosingHandshake),
            )) => {
                info!("EventSub connection closed");
                Ok(Flow::Finished)
            }
            Some(Err(e)) => Err(e.into()),
        }
    }

    async fn handle_message(&self, user: &TwitchUser, text: &str) {
        let message = match EventSubMessage::parse(text) {
            Ok(message) => message,
            Err(e) => {
                warn!("Ignoring malformed EventSub message: {e}");
                return;
            }
        };

        match message.kind() {
            MessageKind::Notification if message.is_stream_online() => {
                self.announce(user).await;
            }
            MessageKind::Keepalive => debug!("EventSub keepalive"),
            MessageKind::Reconnect => debug!("EventSub requested a reconnect, ignoring"),
            MessageKind::Revocation => warn!(
                "EventSub revoked {} subscription",
                message.metadata.subscription_type.as_deref().unwrap_or("a")
            ),
            _ => debug!("Ignoring {} message", message.metadata.message_type),
        }
    }

    async fn announce(&self, user: &TwitchUser) {
        info!("{} went live!", user.display_name);
        let stream = match self.platform.stream(&user.id).await {
            Ok(Some(stream)) => stream,
            Ok(None) => {
                warn!("Stream of {} not visible yet, skipping announcement", user.login);
                return;
            }
            Err(e) => {
                error!("Could not fetch stream of {}: {e}", user.login);
                return;
            }
        };

        let message = render_live_message(&StreamEvent::from_parts(user, &stream));
        if let Err(e) = self.notifier.deliver(&message).await {
            error!("Live announcement was not delivered: {e}");
        }
    }
}
