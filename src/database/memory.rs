// ABOUTME: In-memory credential store for tests and ephemeral runs
// ABOUTME: Keeps the single credential behind an async RwLock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Credential, CredentialStore};
use async_trait::async_trait;
use notifier_core::errors::AppResult;
use tokio::sync::RwLock;

/// Credential store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    slot: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    /// Empty store (logged out)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a credential
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: RwLock::new(Some(credential)),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> AppResult<Option<Credential>> {
        Ok(self.slot.read().await.clone())
    }

    async fn set(&self, credential: &Credential) -> AppResult<()> {
        *self.slot.write().await = Some(credential.clone());
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        *self.slot.write().await = None;
        Ok(())
    }
}
