//! Model registry operations

use chrono::Utc;
use uuid::Uuid;

use super::UsageStore;
use crate::error::{Error, Result};
use crate::types::{LlmModel, ModelRow, ModelUpdate, NewModel};

impl UsageStore {
    /// Register a new model. `is_active` defaults to true when absent.
    pub async fn create_model(&self, new: NewModel) -> Result<LlmModel> {
        new.validate()?;

        let now = Utc::now();
        let model = LlmModel {
            id: Uuid::new_v4(),
            name: new.name,
            provider: new.provider,
            cost_per_token: new.cost_per_token,
            api_key: new.api_key,
            is_active: new.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO llm_models (
                id, name, provider, cost_per_token, api_key,
                is_active, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(model.id.to_string())
        .bind(&model.name)
        .bind(&model.provider)
        .bind(model.cost_per_token)
        .bind(&model.api_key)
        .bind(model.is_active)
        .bind(model.created_at)
        .bind(model.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            model_id = %model.id,
            name = %model.name,
            provider = %model.provider,
            "model registered"
        );
        Ok(model)
    }

    /// List all models in creation order
    pub async fn list_models(&self) -> Result<Vec<LlmModel>> {
        let rows: Vec<ModelRow> = sqlx::query_as("SELECT * FROM llm_models ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// List models with the active flag set
    pub async fn list_active_models(&self) -> Result<Vec<LlmModel>> {
        let rows: Vec<ModelRow> = sqlx::query_as(
            "SELECT * FROM llm_models WHERE is_active = TRUE ORDER BY created_at ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Get a model by ID
    pub async fn get_model(&self, id: Uuid) -> Result<LlmModel> {
        let row: ModelRow = sqlx::query_as("SELECT * FROM llm_models WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::ModelNotFound(id))?;

        row.try_into()
    }

    /// Update a model.
    ///
    /// Name, provider and cost are overwritten unconditionally; api_key and
    /// is_active only when the caller supplied a value.
    pub async fn update_model(&self, id: Uuid, update: ModelUpdate) -> Result<LlmModel> {
        update.validate()?;

        let mut model = self.get_model(id).await?;
        model.name = update.name;
        model.provider = update.provider;
        model.cost_per_token = update.cost_per_token;
        if let Some(api_key) = update.api_key {
            model.api_key = Some(api_key);
        }
        if let Some(is_active) = update.is_active {
            model.is_active = is_active;
        }
        model.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE llm_models SET
                name = ?, provider = ?, cost_per_token = ?, api_key = ?,
                is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&model.name)
        .bind(&model.provider)
        .bind(model.cost_per_token)
        .bind(&model.api_key)
        .bind(model.is_active)
        .bind(model.updated_at)
        .bind(model.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(model)
    }

    /// Delete a model. Its ledger rows are removed by the cascade.
    pub async fn delete_model(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM llm_models WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ModelNotFound(id));
        }

        tracing::info!(model_id = %id, "model deleted");
        Ok(())
    }

    /// Flip a model's active flag
    pub async fn toggle_model(&self, id: Uuid) -> Result<LlmModel> {
        let mut model = self.get_model(id).await?;
        model.is_active = !model.is_active;
        model.updated_at = Utc::now();

        sqlx::query("UPDATE llm_models SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(model.is_active)
            .bind(model.updated_at)
            .bind(model.id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::info!(model_id = %model.id, is_active = model.is_active, "model toggled");
        Ok(model)
    }

    /// Total model count
    pub async fn count_models(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM llm_models")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }

    /// Count of models with the active flag set
    pub async fn count_active_models(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM llm_models WHERE is_active = TRUE")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}
