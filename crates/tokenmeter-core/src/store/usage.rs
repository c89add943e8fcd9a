//! Usage ledger operations
//!
//! The ledger is append-only: records are never updated, and the only
//! deletion path is the model cascade. Appending a record does NOT touch
//! the owning team's usage counter.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::UsageStore;
use crate::error::{Error, Result};
use crate::types::{NewUsage, UsageRecord, UsageRow};

impl UsageStore {
    /// Append a usage record.
    ///
    /// Both references are verified first so a dangling team or model id
    /// fails with the matching NotFound before anything is written. The
    /// cost is caller-supplied and recorded as-is.
    pub async fn record_usage(&self, new: NewUsage) -> Result<UsageRecord> {
        new.validate()?;

        let team_exists: Option<(String,)> = sqlx::query_as("SELECT id FROM teams WHERE id = ?")
            .bind(new.team_id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        if team_exists.is_none() {
            return Err(Error::TeamNotFound(new.team_id));
        }

        let model_exists: Option<(String,)> =
            sqlx::query_as("SELECT id FROM llm_models WHERE id = ?")
                .bind(new.model_id.to_string())
                .fetch_optional(&self.pool)
                .await?;
        if model_exists.is_none() {
            return Err(Error::ModelNotFound(new.model_id));
        }

        let record = UsageRecord {
            id: Uuid::new_v4(),
            team_id: new.team_id,
            model_id: new.model_id,
            tokens: new.tokens,
            cost: new.cost,
            used_at: new.used_at.unwrap_or_else(Utc::now),
        };

        sqlx::query(
            r#"
            INSERT INTO usage_records (id, team_id, model_id, tokens, cost, used_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.to_string())
        .bind(record.team_id.to_string())
        .bind(record.model_id.to_string())
        .bind(record.tokens)
        .bind(record.cost)
        .bind(record.used_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, record.model_id))?;

        tracing::debug!(
            record_id = %record.id,
            team_id = %record.team_id,
            model_id = %record.model_id,
            tokens = record.tokens,
            "usage recorded"
        );
        Ok(record)
    }

    /// List all usage records for a team
    pub async fn list_usage_by_team(&self, team_id: Uuid) -> Result<Vec<UsageRecord>> {
        let rows: Vec<UsageRow> =
            sqlx::query_as("SELECT * FROM usage_records WHERE team_id = ? ORDER BY used_at ASC")
                .bind(team_id.to_string())
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// List a team's usage records inside an inclusive date range
    pub async fn list_usage_by_team_in_range(
        &self,
        team_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>> {
        let rows: Vec<UsageRow> = sqlx::query_as(
            r#"
            SELECT * FROM usage_records
            WHERE team_id = ? AND used_at BETWEEN ? AND ?
            ORDER BY used_at ASC
            "#,
        )
        .bind(team_id.to_string())
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Full ledger scan (aggregation input)
    pub async fn list_usage(&self) -> Result<Vec<UsageRecord>> {
        let rows: Vec<UsageRow> =
            sqlx::query_as("SELECT * FROM usage_records ORDER BY used_at ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

/// A model deleted between the existence check and the insert surfaces as
/// an FK violation; callers should see the missing model, not a raw
/// database error. `model_id` is the only FK on the table.
pub(super) fn map_insert_error(e: sqlx::Error, model_id: Uuid) -> Error {
    match e {
        sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
            Error::ModelNotFound(model_id)
        }
        e => Error::Database(e),
    }
}
