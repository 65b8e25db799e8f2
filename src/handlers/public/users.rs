use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::User;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::users::{self, SignupRequest, UserWithBlogs};
use crate::state::AppState;

/// GET /api/users - every user with the blogs they own
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<UserWithBlogs>> {
    Ok(ApiResponse::success(users::list(state.store()).await?))
}

/// POST /api/users - Create an account
///
/// Input: `{ "username": "...", "name": "...", "password": "..." }`.
/// Username and password need at least 3 characters and the username must be
/// free; violations answer 400 with a message naming the field.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> ApiResult<User> {
    let request = json_body(payload)?;
    let user = users::signup(state.store(), request).await?;
    Ok(ApiResponse::created(user))
}
