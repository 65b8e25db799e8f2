use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::models::Blog;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, Authenticated};
use crate::services::{self, blogs::BlogInput};
use crate::state::AppState;

/// POST /api/blogs - create a blog owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    payload: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<Blog> {
    let input = json_body(payload)?;
    let blog = services::blogs::create(state.store(), &user, input).await?;
    Ok(ApiResponse::created(blog))
}

/// PUT /api/blogs/:id - replace title/author/url/likes on a blog the caller owns
pub async fn update(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    payload: Result<Json<BlogInput>, JsonRejection>,
) -> ApiResult<Blog> {
    let id = services::parse_id(&id)?;
    let input = json_body(payload)?;
    let blog = services::blogs::update(state.store(), &user, id, input).await?;
    Ok(ApiResponse::success(blog))
}

/// DELETE /api/blogs/:id - remove a blog the caller owns
pub async fn delete(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = services::parse_id(&id)?;
    services::blogs::delete(state.store(), &user, id).await?;
    Ok(ApiResponse::no_content())
}
