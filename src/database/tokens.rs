// ABOUTME: SQLite-backed credential store
// ABOUTME: Persists the single Twitch credential row across restarts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use super::{Credential, CredentialStore};
use async_trait::async_trait;
use notifier_core::errors::{AppError, AppResult};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Row, Sqlite};
use tracing::debug;

/// Credential store persisted in a single-row `SQLite` table
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: Pool<Sqlite>,
}

impl SqliteCredentialStore {
    /// Open (creating if needed) the database at `database_url` and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or the table creation fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains(":memory:")
            && !database_url.contains('?')
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_owned()
        };

        // Every in-memory connection is its own database, so pin the pool to one
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(&connection_options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open {database_url}: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        debug!("Credential store ready at {database_url}");
        Ok(store)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn migrate(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS twitch_token (
                type TEXT NOT NULL,
                access TEXT NOT NULL,
                expires INTEGER NOT NULL,
                refresh TEXT
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create twitch_token table: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn get(&self) -> AppResult<Option<Credential>> {
        let row = sqlx::query("SELECT type, access, expires, refresh FROM twitch_token LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to query credential: {e}")))?;

        Ok(row.map(|row| Credential {
            token_type: row.get("type"),
            access: row.get("access"),
            expires: row.get("expires"),
            refresh: row.get("refresh"),
        }))
    }

    async fn set(&self, credential: &Credential) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM twitch_token")
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::database(format!("Failed to replace credential: {e}")))?;

        sqlx::query(
            "INSERT INTO twitch_token (type, access, expires, refresh) VALUES ($1, $2, $3, $4)",
        )
        .bind(&credential.token_type)
        .bind(&credential.access)
        .bind(credential.expires)
        .bind(&credential.refresh)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::database(format!("Failed to store credential: {e}")))?;

        tx.commit().await?;
        Ok(())
    }

    async fn clear(&self) -> AppResult<()> {
        sqlx::query("DELETE FROM twitch_token")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to clear credential: {e}")))?;
        Ok(())
    }
}
