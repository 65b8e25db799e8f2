use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::users::{self, LoginRequest, LoginResponse};
use crate::state::AppState;

/// POST /api/login - Exchange credentials for a bearer token
///
/// Expected Input:
/// ```json
/// { "username": "root", "password": "sekret" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "username": "root", "name": "Superuser" }
/// ```
///
/// A wrong password and an unknown username both answer 401 with the same body.
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let request = json_body(payload)?;
    let response = users::login(state.store(), &state.codec, request).await?;
    Ok(ApiResponse::success(response))
}
