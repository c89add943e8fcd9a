//! Health check endpoints.
//!
//! Provides:
//! - `/health` — simple "healthy" + version (for load balancers)
//! - `/health/detailed` — per-component status (database, sessions)

use axum::extract::Extension;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use std::sync::Arc;
use tokenmeter_core::{AccessGate, UsageStore};
use utoipa::ToSchema;

use crate::middleware::auth::RequireAuth;

/// Simple health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health response with per-component checks
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub checks: HealthChecks,
}

/// All component health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub database: ComponentHealth,
    pub sessions: ComponentHealth,
}

/// Individual component health status
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ComponentHealth {
    fn healthy(latency_ms: u64) -> Self {
        Self {
            status: "healthy",
            latency_ms: Some(latency_ms),
            error: None,
            details: None,
        }
    }

    fn healthy_with_details(latency_ms: u64, details: serde_json::Value) -> Self {
        Self {
            status: "healthy",
            latency_ms: Some(latency_ms),
            error: None,
            details: Some(details),
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            latency_ms: None,
            error: Some(error),
            details: None,
        }
    }
}

/// Simple health check (for load balancers)
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub(crate) async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Detailed health check with component statuses (requires authentication)
async fn detailed_health_check(
    RequireAuth(_auth): RequireAuth,
    Extension(store): Extension<Arc<UsageStore>>,
    Extension(gate): Extension<Arc<AccessGate>>,
) -> Json<DetailedHealthResponse> {
    let db_health = check_database(&store).await;
    let session_health = check_sessions(&gate);

    let overall_status = if db_health.status == "healthy" {
        "healthy"
    } else {
        "degraded"
    };

    Json(DetailedHealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            database: db_health,
            sessions: session_health,
        },
    })
}

/// Check database connectivity with a lightweight count query
async fn check_database(store: &UsageStore) -> ComponentHealth {
    let start = std::time::Instant::now();
    match store.count_models().await {
        Ok(count) => ComponentHealth::healthy_with_details(
            start.elapsed().as_millis() as u64,
            serde_json::json!({ "models": count }),
        ),
        Err(e) => ComponentHealth::unhealthy(e.to_string()),
    }
}

/// Check the session store
fn check_sessions(gate: &AccessGate) -> ComponentHealth {
    ComponentHealth::healthy_with_details(
        0,
        serde_json::json!({
            "active": gate.active_session_count(),
            "oldest_active": gate.oldest_active_session(),
        }),
    )
}

/// Create health routes
pub fn health_routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_health_healthy() {
        let h = ComponentHealth::healthy(42);
        assert_eq!(h.status, "healthy");
        assert_eq!(h.latency_ms, Some(42));
        assert!(h.error.is_none());
    }

    #[test]
    fn test_component_health_unhealthy() {
        let h = ComponentHealth::unhealthy("connection refused".to_string());
        assert_eq!(h.status, "unhealthy");
        assert!(h.latency_ms.is_none());
        assert_eq!(h.error.as_deref(), Some("connection refused"));
    }

    #[test]
    fn test_health_response_serialization() {
        let resp = HealthResponse {
            status: "healthy",
            version: "0.1.0",
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("0.1.0"));
    }

    #[tokio::test]
    async fn test_database_check_reports_healthy() {
        let store = UsageStore::in_memory().await.unwrap();
        let h = check_database(&store).await;
        assert_eq!(h.status, "healthy");
    }
}
