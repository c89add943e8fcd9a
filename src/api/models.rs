//! Model registry API endpoints
//!
//! GET    /api/models - List models
//! POST   /api/models - Register a model
//! GET    /api/models/active - List active models
//! GET    /api/models/:id - Get model details
//! PUT    /api/models/:id - Update a model
//! DELETE /api/models/:id - Delete a model (cascades to usage records)
//! PATCH  /api/models/:id/toggle - Flip the active flag

use axum::routing::{get, patch};
use axum::{extract::Path, Extension, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenmeter_core::{LlmModel, ModelUpdate, NewModel, UsageStore};
use utoipa::ToSchema;
use uuid::Uuid;

use super::{ApiError, ApiResponse};
use crate::middleware::auth::RequireAuth;

/// Model view for API responses. The API key is never exposed.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelView {
    pub id: Uuid,
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LlmModel> for ModelView {
    fn from(model: LlmModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            provider: model.provider,
            cost_per_token: model.cost_per_token,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Request to register a model
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateModelRequest {
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub api_key: Option<String>,
    /// Defaults to true when absent
    pub is_active: Option<bool>,
}

/// Request to update a model.
///
/// `api_key` and `is_active` are partial: absent fields leave the stored
/// values untouched.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateModelRequest {
    pub name: String,
    pub provider: String,
    pub cost_per_token: f64,
    pub api_key: Option<String>,
    pub is_active: Option<bool>,
}

/// List all models
#[utoipa::path(
    get,
    path = "/api/models",
    tag = "models",
    responses(
        (status = 200, description = "List of models", body = Vec<ModelView>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn list_models(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
) -> Result<Json<ApiResponse<Vec<ModelView>>>, ApiError> {
    let models = store.list_models().await?;
    Ok(Json(ApiResponse::success(
        models.into_iter().map(ModelView::from).collect(),
    )))
}

/// List models with the active flag set
#[utoipa::path(
    get,
    path = "/api/models/active",
    tag = "models",
    responses(
        (status = 200, description = "Active models", body = Vec<ModelView>),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn list_active_models(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
) -> Result<Json<ApiResponse<Vec<ModelView>>>, ApiError> {
    let models = store.list_active_models().await?;
    Ok(Json(ApiResponse::success(
        models.into_iter().map(ModelView::from).collect(),
    )))
}

/// Register a model. `is_active` defaults to true.
#[utoipa::path(
    post,
    path = "/api/models",
    tag = "models",
    request_body = CreateModelRequest,
    responses(
        (status = 200, description = "Registered model", body = ModelView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn create_model(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Json(request): Json<CreateModelRequest>,
) -> Result<Json<ApiResponse<ModelView>>, ApiError> {
    let model = store
        .create_model(NewModel {
            name: request.name,
            provider: request.provider,
            cost_per_token: request.cost_per_token,
            api_key: request.api_key,
            is_active: request.is_active,
        })
        .await?;
    Ok(Json(ApiResponse::success(model.into())))
}

/// Get model details
#[utoipa::path(
    get,
    path = "/api/models/{id}",
    tag = "models",
    params(("id" = Uuid, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model details", body = ModelView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn get_model(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ModelView>>, ApiError> {
    let model = store.get_model(id).await?;
    Ok(Json(ApiResponse::success(model.into())))
}

/// Update a model
#[utoipa::path(
    put,
    path = "/api/models/{id}",
    tag = "models",
    params(("id" = Uuid, Path, description = "Model ID")),
    request_body = UpdateModelRequest,
    responses(
        (status = 200, description = "Updated model", body = ModelView),
        (status = 400, description = "Validation failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn update_model(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateModelRequest>,
) -> Result<Json<ApiResponse<ModelView>>, ApiError> {
    let model = store
        .update_model(
            id,
            ModelUpdate {
                name: request.name,
                provider: request.provider,
                cost_per_token: request.cost_per_token,
                api_key: request.api_key,
                is_active: request.is_active,
            },
        )
        .await?;
    Ok(Json(ApiResponse::success(model.into())))
}

/// Delete a model. Dependent usage records are removed by the cascade.
#[utoipa::path(
    delete,
    path = "/api/models/{id}",
    tag = "models",
    params(("id" = Uuid, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Model deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn delete_model(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    store.delete_model(id).await?;
    Ok(Json(ApiResponse::success(())))
}

/// Flip a model's active flag
#[utoipa::path(
    patch,
    path = "/api/models/{id}/toggle",
    tag = "models",
    params(("id" = Uuid, Path, description = "Model ID")),
    responses(
        (status = 200, description = "Toggled model", body = ModelView),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Model not found")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn toggle_model(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ModelView>>, ApiError> {
    let model = store.toggle_model(id).await?;
    Ok(Json(ApiResponse::success(model.into())))
}

/// Create the model routes
pub fn model_routes() -> Router {
    Router::new()
        .route("/api/models", get(list_models).post(create_model))
        .route("/api/models/active", get(list_active_models))
        .route(
            "/api/models/:id",
            get(get_model).put(update_model).delete(delete_model),
        )
        .route("/api/models/:id/toggle", patch(toggle_model))
}
