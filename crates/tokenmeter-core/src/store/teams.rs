//! Team registry operations

use chrono::Utc;
use uuid::Uuid;

use super::UsageStore;
use crate::error::{Error, Result};
use crate::types::{NewTeam, Team, TeamRow, TeamUpdate};

impl UsageStore {
    /// Create a new team. Usage starts at zero.
    pub async fn create_team(&self, new: NewTeam) -> Result<Team> {
        new.validate()?;

        let team = Team::new(new.name, new.quota);

        sqlx::query(
            r#"
            INSERT INTO teams (id, name, quota, usage, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(team.id.to_string())
        .bind(&team.name)
        .bind(team.quota)
        .bind(team.usage)
        .bind(team.created_at)
        .bind(team.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::info!(team_id = %team.id, name = %team.name, quota = team.quota, "team created");
        Ok(team)
    }

    /// List all teams in creation order
    pub async fn list_teams(&self) -> Result<Vec<Team>> {
        let rows: Vec<TeamRow> = sqlx::query_as("SELECT * FROM teams ORDER BY created_at ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Get a team by ID
    pub async fn get_team(&self, id: Uuid) -> Result<Team> {
        let row: TeamRow = sqlx::query_as("SELECT * FROM teams WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::TeamNotFound(id))?;

        row.try_into()
    }

    /// Overwrite a team's name and quota. The usage counter is untouched.
    pub async fn update_team(&self, id: Uuid, update: TeamUpdate) -> Result<Team> {
        update.validate()?;

        let mut team = self.get_team(id).await?;
        team.name = update.name;
        team.quota = update.quota;
        team.updated_at = Utc::now();

        sqlx::query("UPDATE teams SET name = ?, quota = ?, updated_at = ? WHERE id = ?")
            .bind(&team.name)
            .bind(team.quota)
            .bind(team.updated_at)
            .bind(team.id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(team)
    }

    /// Overwrite a team's quota only. The usage counter is untouched.
    pub async fn set_quota(&self, id: Uuid, quota: i64) -> Result<Team> {
        if quota < 0 {
            return Err(Error::validation("quota", "must be non-negative"));
        }

        let mut team = self.get_team(id).await?;
        team.quota = quota;
        team.updated_at = Utc::now();

        sqlx::query("UPDATE teams SET quota = ?, updated_at = ? WHERE id = ?")
            .bind(team.quota)
            .bind(team.updated_at)
            .bind(team.id.to_string())
            .execute(&self.pool)
            .await?;

        tracing::info!(team_id = %team.id, quota, "team quota updated");
        Ok(team)
    }

    /// Delete a team.
    ///
    /// Ledger rows referencing the team are NOT removed; only model deletion
    /// cascades to the ledger.
    pub async fn delete_team(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TeamNotFound(id));
        }

        tracing::info!(team_id = %id, "team deleted");
        Ok(())
    }
}
