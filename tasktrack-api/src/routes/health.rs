/// Root and health check endpoints
///
/// # Endpoints
///
/// ```text
/// GET /
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::db::pool;

/// Root response
#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service name
    pub message: String,

    /// Application version
    pub version: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Application version
    pub version: String,

    /// Database status
    pub database: String,
}

/// Names the service; no database access
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "TaskTrack API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Health check handler
///
/// Always answers 200; a failed database check reports `degraded`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let connected = match pool::health_check(&state.db).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
    };

    Json(HealthResponse {
        status: if connected { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if connected { "connected" } else { "disconnected" }.to_string(),
    })
}
