// handlers/mod.rs - Two-tier handler layout
//
// Public (no identity)      → list/show blogs, users, login, signup, health
// Protected (Authenticated) → create/update/delete blogs
//
// Every route sits behind the bearer extraction layer; only protected
// handlers take the `Authenticated` extractor that resolves it.

pub mod protected;
pub mod public;

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into our error shape
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::invalid_json(rejection.body_text()))
}
