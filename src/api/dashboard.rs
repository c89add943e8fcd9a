//! Dashboard API endpoint
//!
//! GET /api/dashboard — derived aggregate view over teams, models, and the
//! usage ledger. Computed fresh on every call.

use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tokenmeter_core::{compute_dashboard, DashboardSnapshot, TeamUsageSummary, UsageStore};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;

/// Dashboard view for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DashboardView {
    pub total_teams: usize,
    pub total_quota: i64,
    pub total_usage: i64,
    pub total_cost: f64,
    pub total_models: i64,
    pub active_models: i64,
    pub team_summaries: Vec<TeamSummaryView>,
}

/// Per-team slice of the dashboard
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamSummaryView {
    pub team_id: Uuid,
    pub team_name: String,
    pub quota: i64,
    pub usage: i64,
    pub usage_percentage: f64,
    /// Count of the team's ledger rows
    pub model_count: usize,
}

impl From<TeamUsageSummary> for TeamSummaryView {
    fn from(summary: TeamUsageSummary) -> Self {
        Self {
            team_id: summary.team_id,
            team_name: summary.team_name,
            quota: summary.quota,
            usage: summary.usage,
            usage_percentage: summary.usage_percentage,
            model_count: summary.model_count,
        }
    }
}

impl From<DashboardSnapshot> for DashboardView {
    fn from(snapshot: DashboardSnapshot) -> Self {
        Self {
            total_teams: snapshot.total_teams,
            total_quota: snapshot.total_quota,
            total_usage: snapshot.total_usage,
            total_cost: snapshot.total_cost,
            total_models: snapshot.total_models,
            active_models: snapshot.active_models,
            team_summaries: snapshot
                .team_summaries
                .into_iter()
                .map(TeamSummaryView::from)
                .collect(),
        }
    }
}

/// Compute the dashboard snapshot
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard snapshot", body = DashboardView),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn get_dashboard(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
) -> Result<Json<ApiResponse<DashboardView>>, ApiError> {
    let snapshot = compute_dashboard(&store).await?;
    Ok(Json(ApiResponse::success(snapshot.into())))
}

/// Create the dashboard routes
pub fn dashboard_routes() -> Router {
    Router::new().route("/api/dashboard", get(get_dashboard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_view_mapping() {
        let snapshot = DashboardSnapshot {
            total_teams: 2,
            total_quota: 15_000,
            total_usage: 5_000,
            total_cost: 0.3,
            total_models: 3,
            active_models: 2,
            team_summaries: vec![TeamUsageSummary {
                team_id: Uuid::new_v4(),
                team_name: "alpha".into(),
                quota: 10_000,
                usage: 5_000,
                usage_percentage: 50.0,
                model_count: 4,
            }],
        };

        let view = DashboardView::from(snapshot);
        assert_eq!(view.total_teams, 2);
        assert_eq!(view.team_summaries.len(), 1);
        assert_eq!(view.team_summaries[0].usage_percentage, 50.0);
        assert_eq!(view.team_summaries[0].model_count, 4);
    }
}
