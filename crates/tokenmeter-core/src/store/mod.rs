//! Registry and ledger storage using SQLite
//!
//! One store handle backs the team registry, the model registry, and the
//! usage ledger. Each operation executes as a single statement (or a single
//! read-then-write pair), so SQLite's own transaction boundary is the unit
//! of atomicity; the engine adds no locking of its own.

mod migrations;
mod models;
mod teams;
mod usage;


use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Error, Result};

/// SQLite-backed store for teams, models, and usage records
pub struct UsageStore {
    pool: Pool<Sqlite>,
}

impl UsageStore {
    /// Create a new store from a database path
    pub async fn from_path(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Internal(format!("failed to create directory: {e}")))?;
        }

        // foreign_keys must be on for the model -> usage cascade to fire
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Create an in-memory store (test isolation).
    ///
    /// A single connection is used because every SQLite `:memory:`
    /// connection gets its own private database.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(Error::Database)?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }
}
