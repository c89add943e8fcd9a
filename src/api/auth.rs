//! Session token API endpoints
//!
//! POST /api/auth/login - Issue a bearer token
//! POST /api/auth/logout - Revoke the presented token
//! GET  /api/auth/me - Current session details
//! GET  /api/auth/validate - Check the presented token
//!
//! Login carries the original system's development semantics: every
//! username/password pair is accepted and granted the admin role.

use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokenmeter_core::{AccessGate, AuthError, Error};
use utoipa::ToSchema;

use super::{ApiError, ApiResponse};
use crate::middleware::auth::bearer_token;

/// Login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    #[allow(dead_code)] // accepted but not checked in development mode
    pub password: String,
}

/// Login / current-session response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub role: String,
}

/// Issue a session token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session token issued", body = LoginResponse),
        (status = 400, description = "Validation failure")
    )
)]
pub(crate) async fn login(
    Extension(gate): Extension<Arc<AccessGate>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if request.username.trim().is_empty() {
        return Err(Error::validation("username", "must not be empty").into());
    }

    let token = gate.login(&request.username).map_err(ApiError::from)?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        username: request.username,
        role: "admin".to_string(),
    })))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Token revoked"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn logout(
    Extension(gate): Extension<Arc<AccessGate>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    // Nothing to revoke when the gate admits everyone
    if !gate.is_enabled() {
        return Ok(Json(ApiResponse::success(())));
    }

    let token = bearer_token(&headers).ok_or(AuthError::MissingCredentials)?;
    gate.revoke_token(&token)?;
    Ok(Json(ApiResponse::success(())))
}

/// Current session details
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Session details", body = LoginResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn me(
    Extension(gate): Extension<Arc<AccessGate>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    // The gate decides: an absent token is MissingCredentials when auth is
    // enforced, and an anonymous admin context when it is not.
    let token = bearer_token(&headers).unwrap_or_default();
    let ctx = gate.validate_token(&token)?;
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        username: ctx.username,
        role: ctx.role,
    })))
}

/// Check the presented token
#[utoipa::path(
    get,
    path = "/api/auth/validate",
    tag = "auth",
    responses(
        (status = 200, description = "Token is valid"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_token" = []))
)]
pub(crate) async fn validate(
    Extension(gate): Extension<Arc<AccessGate>>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let token = bearer_token(&headers).unwrap_or_default();
    gate.validate_token(&token)?;
    Ok(Json(ApiResponse::success(())))
}

/// Create the auth routes
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/me", get(me))
        .route("/api/auth/validate", get(validate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_issues_token() {
        let gate = Arc::new(AccessGate::new(true));
        let response = login(
            Extension(gate.clone()),
            Json(LoginRequest {
                username: "alice".into(),
                password: "whatever".into(),
            }),
        )
        .await
        .unwrap();

        let data = response.0.data.unwrap();
        assert_eq!(data.username, "alice");
        assert_eq!(data.role, "admin");
        assert!(gate.validate_token(&data.token).is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_blank_username() {
        let gate = Arc::new(AccessGate::new(true));
        let result = login(
            Extension(gate),
            Json(LoginRequest {
                username: "   ".into(),
                password: "x".into(),
            }),
        )
        .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_me_without_header_rejected_when_enforced() {
        let gate = Arc::new(AccessGate::new(true));
        let result = me(Extension(gate), HeaderMap::new()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_disabled_gate_admits_headerless_session_calls() {
        let gate = Arc::new(AccessGate::new(false));

        let response = me(Extension(gate.clone()), HeaderMap::new())
            .await
            .unwrap();
        let data = response.0.data.unwrap();
        assert_eq!(data.username, "anonymous");
        assert_eq!(data.role, "admin");

        assert!(validate(Extension(gate.clone()), HeaderMap::new())
            .await
            .is_ok());
        assert!(logout(Extension(gate), HeaderMap::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_then_me_fails() {
        let gate = Arc::new(AccessGate::new(true));
        let token = gate.login("alice").unwrap();

        let mut headers = HeaderMap::new();
        headers.insert(
            "authorization",
            format!("Bearer {token}").parse().unwrap(),
        );

        logout(Extension(gate.clone()), headers.clone())
            .await
            .unwrap();

        let result = me(Extension(gate), headers).await;
        assert!(result.is_err());
    }
}
