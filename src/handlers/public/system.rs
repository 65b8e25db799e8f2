use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::Store;
use crate::state::AppState;

/// GET / - service description
pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "name": "Blog List API",
        "version": version,
        "endpoints": {
            "blogs": "/api/blogs[/:id] (GET public; POST/PUT/DELETE bearer token)",
            "stats": "/api/blogs/stats (public)",
            "users": "/api/users (GET list, POST signup)",
            "login": "/api/login (POST, token acquisition)",
            "health": "/health (public)",
        }
    }))
}

/// GET /health - liveness plus a store probe
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.store().health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "store": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "store": "unavailable"
                })),
            )
        }
    }
}

/// Fallback for unmatched routes
pub async fn unknown_endpoint() -> crate::error::ApiError {
    crate::error::ApiError::not_found("unknown endpoint")
}
