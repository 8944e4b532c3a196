// ABOUTME: Core types and constants for the Twitch-to-Discord stream notifier
// ABOUTME: Foundation crate with the error taxonomy and domain constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Notifier Core
//!
//! Foundation crate providing shared types and constants for the stream notifier.
//! This crate is designed to change infrequently, enabling incremental
//! compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Polling interval, `EventSub` names, endpoint bases and embed styling

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;
