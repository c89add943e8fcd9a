use super::UsageStore;
use crate::error::{Error, Result};

impl UsageStore {
    /// Run database migrations
    pub(super) async fn migrate(&self) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS teams (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                quota INTEGER NOT NULL DEFAULT 0,
                usage INTEGER NOT NULL DEFAULT 0,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (teams): {e}")))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS llm_models (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                provider TEXT NOT NULL,
                cost_per_token REAL NOT NULL,
                api_key TEXT,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMP NOT NULL,
                updated_at TIMESTAMP NOT NULL
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (llm_models): {e}")))?;

        // team_id deliberately carries no foreign key: deleting a team leaves
        // its ledger rows in place, while deleting a model removes them.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS usage_records (
                id TEXT PRIMARY KEY,
                team_id TEXT NOT NULL,
                model_id TEXT NOT NULL,
                tokens INTEGER NOT NULL,
                cost REAL NOT NULL,
                used_at TIMESTAMP NOT NULL,
                FOREIGN KEY (model_id) REFERENCES llm_models(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| Error::Internal(format!("migration failed (usage_records): {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_usage_team ON usage_records(team_id)")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Internal(format!("migration failed (idx_usage_team): {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_usage_model ON usage_records(model_id)")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Internal(format!("migration failed (idx_usage_model): {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_usage_used_at ON usage_records(used_at)")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Internal(format!("migration failed (idx_usage_used_at): {e}")))?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_models_active ON llm_models(is_active)")
            .execute(&mut *tx)
            .await
            .map_err(|e| Error::Internal(format!("migration failed (idx_models_active): {e}")))?;

        tx.commit()
            .await
            .map_err(|e| Error::Internal(e.to_string()))?;

        Ok(())
    }
}
