// ABOUTME: Credential storage for the single Twitch bearer credential
// ABOUTME: Defines the CredentialStore contract with SQLite and in-memory backends
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Credential Storage
//!
//! The notifier holds at most one credential at a time. Absence means the
//! user is logged out. Every successful token exchange overwrites the row;
//! logout, a rejected refresh token and a hard validation failure clear it.
//!
//! Stores only promise that `get` returns the most recently committed value.
//! Atomicity of `set`/`clear` is the backend's responsibility.

mod credential;
mod memory;
mod tokens;

pub use credential::Credential;
pub use memory::MemoryCredentialStore;
pub use tokens::SqliteCredentialStore;

use async_trait::async_trait;
use notifier_core::errors::AppResult;

/// Single-row, last-write-wins storage of the current credential
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Current credential, or `None` when logged out
    async fn get(&self) -> AppResult<Option<Credential>>;

    /// Replace the stored credential
    async fn set(&self, credential: &Credential) -> AppResult<()>;

    /// Remove the stored credential
    async fn clear(&self) -> AppResult<()>;
}
