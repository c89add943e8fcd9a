//! Team registry API endpoints
//!
//! GET    /api/teams - List teams
//! POST   /api/teams - Create a team
//! GET    /api/teams/:id - Get team details
//! PUT    /api/teams/:id - Update name and quota
//! DELETE /api/teams/:id - Delete a team
//! PATCH  /api/teams/:id/quota - Set quota only

use axum::routing::{get, patch};
use axum::{extract::Path, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenmeter_core::{NewTeam, Team, TeamUpdate, UsageStore};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;

/// Team view for API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamView {
    pub id: Uuid,
    pub name: String,
    pub quota: i64,
    pub usage: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Team> for TeamView {
    fn from(team: Team) -> Self {
        Self {
            id: team.id,
            name: team.name,
            quota: team.quota,
            usage: team.usage,
            created_at: team.created_at,
            updated_at: team.updated_at,
        }
    }
}

/// Request to create a team
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
    pub quota: i64,
}

/// Request to update a team (full overwrite of both fields)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTeamRequest {
    pub name: String,
    pub quota: i64,
}

/// Request to set a team's quota
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetQuotaRequest {
    pub quota: i64,
}

/// List all teams
#[utoipa::path(
    get,
    path = "/api/teams",
    tag = "teams",
    responses(
        (status = 200, description = "List of teams", body = Vec<TeamView>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn list_teams(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
) -> Result<Json<ApiResponse<Vec<TeamView>>>, ApiError> {
    let teams = store.list_teams().await?;
    Ok(Json(ApiResponse::success(
        teams.into_iter().map(TeamView::from).collect(),
    )))
}

/// Create a team. Usage starts at zero.
#[utoipa::path(
    post,
    path = "/api/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Created team", body = TeamView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn create_team(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Json(request): Json<CreateTeamRequest>,
) -> Result<Json<ApiResponse<TeamView>>, ApiError> {
    let team = store
        .create_team(NewTeam {
            name: request.name,
            quota: request.quota,
        })
        .await?;
    Ok(Json(ApiResponse::success(team.into())))
}

/// Get team details
#[utoipa::path(
    get,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team details", body = TeamView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn get_team(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<TeamView>>, ApiError> {
    let team = store.get_team(id).await?;
    Ok(Json(ApiResponse::success(team.into())))
}

/// Update a team's name and quota. The usage counter is untouched.
#[utoipa::path(
    put,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = UpdateTeamRequest,
    responses(
        (status = 200, description = "Updated team", body = TeamView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn update_team(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTeamRequest>,
) -> Result<Json<ApiResponse<TeamView>>, ApiError> {
    let team = store
        .update_team(
            id,
            TeamUpdate {
                name: request.name,
                quota: request.quota,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(team.into())))
}

/// Delete a team. Its ledger rows are left in place.
#[utoipa::path(
    delete,
    path = "/api/teams/{id}",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    responses(
        (status = 200, description = "Team deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn delete_team(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    store.delete_team(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Set a team's quota. The usage counter is untouched.
#[utoipa::path(
    patch,
    path = "/api/teams/{id}/quota",
    tag = "teams",
    params(("id" = Uuid, Path, description = "Team ID")),
    request_body = SetQuotaRequest,
    responses(
        (status = 200, description = "Updated team", body = TeamView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn set_quota(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetQuotaRequest>,
) -> Result<Json<ApiResponse<TeamView>>, ApiError> {
    let team = store.set_quota(id, request.quota).await?;
    Ok(Json(ApiResponse::success(team.into())))
}

/// Create the team routes
pub fn team_routes() -> Router {
    Router::new()
        .route("/api/teams", get(list_teams).post(create_team))
        .route(
            "/api/teams/:id",
            get(get_team).put(update_team).delete(delete_team),
        )
        .route("/api/teams/:id/quota", patch(set_quota))
}
