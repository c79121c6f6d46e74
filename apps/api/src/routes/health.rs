//! Health check HTTP route handlers
//!
//! - `GET /health` - Simple liveness check (returns 200 OK)
//! - `GET /health/live` - Liveness probe with version
//! - `GET /health/ready` - Readiness check against the document store

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use sqlx::PgPool;

use crate::config::StoreBackend;

/// Shared state for health check handlers
#[derive(Clone)]
pub struct HealthState {
    pub backend: StoreBackend,
    /// Present only for the postgres backend
    pub pool: Option<PgPool>,
}

impl HealthState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            backend: StoreBackend::Postgres,
            pool: Some(pool),
        }
    }

    pub fn memory() -> Self {
        Self {
            backend: StoreBackend::Memory,
            pool: None,
        }
    }
}

/// Create health check router
pub fn health_router(state: HealthState) -> Router {
    Router::new()
        .route("/", get(simple_health))
        .route("/live", get(liveness_probe))
        .route("/ready", get(readiness_probe))
        .with_state(state)
}

async fn simple_health() -> &'static str {
    "OK"
}

async fn liveness_probe() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Readiness probe
///
/// # Response
/// - 200 OK if the store answers
/// - 503 Service Unavailable otherwise
async fn readiness_probe(State(state): State<HealthState>) -> impl IntoResponse {
    let store_ok = match &state.pool {
        Some(pool) => match sqlx::query("SELECT 1").execute(pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Readiness check: database unreachable");
                false
            }
        },
        None => true,
    };

    let status_code = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": if store_ok { "ready" } else { "unavailable" },
            "store": state.backend.to_string(),
        })),
    )
}
