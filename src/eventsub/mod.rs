// ABOUTME: EventSub WebSocket session announcing stream.online events
// ABOUTME: Message model, live announcement rendering and the session state machine
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # `EventSub`
//!
//! One [`EventSession`] owns the long-lived socket to the `EventSub` WebSocket
//! endpoint. A run connects, waits for the welcome, subscribes to
//! `stream.online` for the logged-in user and then announces every matching
//! notification through a [`crate::discord::Notifier`] until it is stopped or
//! the connection ends.

mod messages;
mod render;
mod session;

pub use messages::{EventSubMessage, MessageKind, MessageMetadata};
pub use render::{render_live_message, StreamEvent};
pub use session::{EventSession, SessionState};
