//! Dashboard aggregation
//!
//! Derives a point-in-time snapshot from the team registry, the model
//! registry, and the usage ledger. Nothing is cached or persisted: every
//! call re-reads the full team, model, and usage sets. The reads are
//! independent, so a mutation landing mid-computation can be observed by
//! some reads and not others; any read failure aborts the whole snapshot.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::store::UsageStore;

/// Derived aggregate view over registries and ledger. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    /// Number of registered teams
    pub total_teams: usize,
    /// Sum of all team quotas
    pub total_quota: i64,
    /// Sum of all team usage counters (not a ledger recomputation)
    pub total_usage: i64,
    /// Sum of cost across every ledger record, system-wide
    pub total_cost: f64,
    /// Number of registered models
    pub total_models: i64,
    /// Number of models with the active flag set
    pub active_models: i64,
    /// Per-team summaries in registry order
    pub team_summaries: Vec<TeamUsageSummary>,
}

/// Per-team slice of the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamUsageSummary {
    pub team_id: Uuid,
    pub team_name: String,
    pub quota: i64,
    pub usage: i64,
    /// usage / quota * 100, or exactly 0.0 when quota is 0
    pub usage_percentage: f64,
    /// Count of the team's ledger rows (not distinct models)
    pub model_count: usize,
}

/// Percentage of quota consumed. A zero quota yields exactly 0.0, never a
/// division error or NaN, regardless of the usage value.
fn usage_percentage(usage: i64, quota: i64) -> f64 {
    if quota > 0 {
        usage as f64 * 100.0 / quota as f64
    } else {
        0.0
    }
}

/// Compute the dashboard snapshot from the underlying store.
pub async fn compute_dashboard(store: &UsageStore) -> Result<DashboardSnapshot> {
    let teams = store.list_teams().await?;

    let total_teams = teams.len();
    let total_quota: i64 = teams.iter().map(|t| t.quota).sum();
    let total_usage: i64 = teams.iter().map(|t| t.usage).sum();

    let total_models = store.count_models().await?;
    let active_models = store.count_active_models().await?;

    let all_usage = store.list_usage().await?;
    let total_cost: f64 = all_usage.iter().map(|u| u.cost).sum();

    let mut team_summaries = Vec::with_capacity(teams.len());
    for team in &teams {
        let records = store.list_usage_by_team(team.id).await?;
        team_summaries.push(TeamUsageSummary {
            team_id: team.id,
            team_name: team.name.clone(),
            quota: team.quota,
            usage: team.usage,
            usage_percentage: usage_percentage(team.usage, team.quota),
            model_count: records.len(),
        });
    }

    Ok(DashboardSnapshot {
        total_teams,
        total_quota,
        total_usage,
        total_cost,
        total_models,
        active_models,
        team_summaries,
    })
}
