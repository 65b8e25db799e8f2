use axum::extract::{Path, State};

use crate::database::models::{Blog, BlogWithOwner};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{self, stats::BlogStats};
use crate::state::AppState;

/// GET /api/blogs - every blog with its owner summarized
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<BlogWithOwner>> {
    let blogs = services::blogs::list(state.store()).await?;
    Ok(ApiResponse::success(blogs))
}

/// GET /api/blogs/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Blog> {
    let id = services::parse_id(&id)?;
    let blog = services::blogs::get(state.store(), id).await?;
    Ok(ApiResponse::success(blog))
}

/// GET /api/blogs/stats - count, total likes and the most-liked blog
pub async fn stats(State(state): State<AppState>) -> ApiResult<BlogStats> {
    Ok(ApiResponse::success(services::stats::summarize(state.store()).await?))
}
