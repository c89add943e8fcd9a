//! API Documentation - Swagger UI
//!
//! Provides OpenAPI documentation at /docs

use axum::Router;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use super::{
    auth::{LoginRequest, LoginResponse},
    dashboard::{DashboardView, TeamSummaryView},
    health::HealthResponse,
    models::{CreateModelRequest, ModelView, UpdateModelRequest},
    teams::{CreateTeamRequest, SetQuotaRequest, TeamView, UpdateTeamRequest},
    usage::{RecordUsageRequest, UsageView},
};

/// Tokenmeter API OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tokenmeter API",
        version = "1.0.0",
        description = "LLM usage and quota tracking REST API.

## Overview
Tokenmeter provides an API for:
- **Teams**: Register teams with token quotas and usage counters
- **Models**: Register LLM models with per-token costs and active flags
- **Usage**: Append usage records and read per-team history
- **Dashboard**: Aggregate snapshot across teams and models
- **Auth**: Session token issuance and revocation

## Authentication
Most endpoints require a bearer token in the `Authorization` header:
```
Authorization: Bearer <token>
```
Tokens are issued by `POST /api/auth/login`.
"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Auth
        crate::api::auth::login,
        crate::api::auth::logout,
        crate::api::auth::me,
        crate::api::auth::validate,
        // Teams
        crate::api::teams::list_teams,
        crate::api::teams::create_team,
        crate::api::teams::get_team,
        crate::api::teams::update_team,
        crate::api::teams::delete_team,
        crate::api::teams::set_quota,
        // Models
        crate::api::models::list_models,
        crate::api::models::list_active_models,
        crate::api::models::create_model,
        crate::api::models::get_model,
        crate::api::models::update_model,
        crate::api::models::delete_model,
        crate::api::models::toggle_model,
        // Usage
        crate::api::usage::record_usage,
        crate::api::usage::list_team_usage,
        // Dashboard
        crate::api::dashboard::get_dashboard,
        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            // Auth
            LoginRequest,
            LoginResponse,
            // Teams
            TeamView,
            CreateTeamRequest,
            UpdateTeamRequest,
            SetQuotaRequest,
            // Models
            ModelView,
            CreateModelRequest,
            UpdateModelRequest,
            // Usage
            UsageView,
            RecordUsageRequest,
            // Dashboard
            DashboardView,
            TeamSummaryView,
            // Health
            HealthResponse,
        )
    ),
    modifiers(&BearerTokenScheme),
    tags(
        (name = "auth", description = "Session token issuance and revocation"),
        (name = "teams", description = "Team registry and quotas"),
        (name = "models", description = "Model registry"),
        (name = "usage", description = "Usage ledger"),
        (name = "dashboard", description = "Aggregate usage snapshot"),
        (name = "health", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_token` security scheme referenced by the endpoints
struct BearerTokenScheme;

impl Modify for BearerTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_token",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}

/// Create documentation routes
pub fn docs_routes() -> Router {
    Router::new().merge(SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()))
}
