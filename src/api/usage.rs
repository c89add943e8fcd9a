//! Usage ledger API endpoints
//!
//! POST /api/usage - Append a usage record
//! GET  /api/usage/teams/:id - List a team's records, optionally bounded
//!      by an inclusive `start`/`end` range

use axum::extract::{Path, Query};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenmeter_core::{Error, NewUsage, UsageRecord, UsageStore};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;

/// Usage record view for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UsageView {
    pub id: Uuid,
    pub team_id: Uuid,
    pub model_id: Uuid,
    pub tokens: i64,
    pub cost: f64,
    pub used_at: DateTime<Utc>,
}

impl From<UsageRecord> for UsageView {
    fn from(record: UsageRecord) -> Self {
        Self {
            id: record.id,
            team_id: record.team_id,
            model_id: record.model_id,
            tokens: record.tokens,
            cost: record.cost,
            used_at: record.used_at,
        }
    }
}

/// Request to append a usage record
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordUsageRequest {
    pub team_id: Uuid,
    pub model_id: Uuid,
    pub tokens: i64,
    /// Snapshot cost; recorded as supplied, never recomputed
    pub cost: f64,
    /// Defaults to the current time
    pub used_at: Option<DateTime<Utc>>,
}

/// Optional inclusive date range for ledger reads
#[derive(Debug, Deserialize, IntoParams)]
pub struct UsageRangeQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Append a usage record
#[utoipa::path(
    post,
    path = "/api/usage",
    tag = "usage",
    request_body = RecordUsageRequest,
    responses(
        (status = 200, description = "Appended record", body = UsageView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team or model not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn record_usage(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Json(request): Json<RecordUsageRequest>,
) -> Result<Json<ApiResponse<UsageView>>, ApiError> {
    let record = store
        .record_usage(NewUsage {
            team_id: request.team_id,
            model_id: request.model_id,
            tokens: request.tokens,
            cost: request.cost,
            used_at: request.used_at,
        })
        .await?;
    Ok(Json(ApiResponse::success(record.into())))
}

/// List a team's usage records
#[utoipa::path(
    get,
    path = "/api/usage/teams/{id}",
    tag = "usage",
    params(
        ("id" = Uuid, Path, description = "Team ID"),
        UsageRangeQuery
    ),
    responses(
        (status = 200, description = "Usage records", body = Vec<UsageView>),
        (status = 400, description = "Half-open range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn list_team_usage(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
    Query(range): Query<UsageRangeQuery>,
) -> Result<Json<ApiResponse<Vec<UsageView>>>, ApiError> {
    let records = match (range.start, range.end) {
        (Some(start), Some(end)) => store.list_usage_by_team_in_range(id, start, end).await?,
        (None, None) => store.list_usage_by_team(id).await?,
        _ => {
            return Err(Error::validation("start", "start and end must be supplied together").into())
        }
    };
    Ok(Json(ApiResponse::success(
        records.into_iter().map(UsageView::from).collect(),
    )))
}

/// Create the usage routes
pub fn usage_routes() -> Router {
    Router::new()
        .route("/api/usage", post(record_usage))
        .route("/api/usage/teams/:id", get(list_team_usage))
}
