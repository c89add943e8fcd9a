//! Web API module for Tokenmeter
//!
//! Provides REST API endpoints for:
//! - Team registry (quotas, usage counters)
//! - Model registry (per-token costs, active flags)
//! - Usage ledger (append, per-team reads)
//! - Dashboard snapshot
//! - Session tokens (login/logout)

pub mod auth;
pub mod dashboard;
pub mod docs;
pub mod health;
pub mod models;
pub mod teams;
pub mod usage;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;
use tokenmeter_core::{AuthError, Error};

pub use auth::auth_routes;
pub use dashboard::dashboard_routes;
pub use docs::docs_routes;
pub use health::health_routes;
pub use models::model_routes;
pub use teams::team_routes;
pub use usage::usage_routes;

/// Create the API router with all endpoints
pub fn router() -> Router {
    Router::new()
        .merge(auth_routes())
        .merge(team_routes())
        .merge(model_routes())
        .merge(usage_routes())
        .merge(dashboard_routes())
        .merge(health_routes())
        .merge(docs_routes())
}

/// API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// JSON body for failed requests
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error type returned by API handlers.
///
/// Maps engine errors onto HTTP statuses: NotFound → 404, validation → 400,
/// auth → 401, everything else → 500 with the detail logged and the caller
/// message scrubbed.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                success: false,
                error: error.into(),
                code: code.into(),
                field: None,
            },
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::TeamNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                format!("team not found: {id}"),
                "TEAM_NOT_FOUND",
            ),
            Error::ModelNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                format!("model not found: {id}"),
                "MODEL_NOT_FOUND",
            ),
            Error::Validation { field, message } => {
                let mut api_err = Self::new(
                    StatusCode::BAD_REQUEST,
                    format!("{field}: {message}"),
                    "VALIDATION_FAILED",
                );
                api_err.body.field = Some(field.to_string());
                api_err
            }
            Error::Database(e) => {
                tracing::error!(error = %e, "store failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error",
                    "INTERNAL_ERROR",
                )
            }
            Error::Internal(msg) => {
                tracing::error!(error = %msg, "internal failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error",
                    "INTERNAL_ERROR",
                )
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::MissingCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "Authentication required",
                "UNAUTHORIZED",
            ),
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "Invalid token",
                "INVALID_CREDENTIALS",
            ),
            AuthError::TokenRevoked => Self::new(
                StatusCode::UNAUTHORIZED,
                "Token has been revoked",
                "TOKEN_REVOKED",
            ),
            AuthError::Internal(msg) => {
                tracing::error!(error = %msg, "auth internal failure");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error",
                    "INTERNAL_ERROR",
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
