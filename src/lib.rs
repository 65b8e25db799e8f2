pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;
pub mod types;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let api = &state.config.api;
    let cors = cors_layer(&state.config.security.cors_origins);

    let mut router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(blog_routes())
        .merge(user_routes())
        .fallback(handlers::public::system::unknown_endpoint)
        // Auth stage 1: runs for every request, never rejects
        .layer(axum::middleware::from_fn(middleware::extract_bearer_token))
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes))
        .layer(cors);

    if api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn blog_routes() -> Router<AppState> {
    use handlers::{protected, public};

    Router::new()
        .route(
            "/api/blogs",
            get(public::blogs_list).post(protected::blog_create),
        )
        .route("/api/blogs/stats", get(public::blogs_stats))
        .route(
            "/api/blogs/:id",
            get(public::blog_show)
                .put(protected::blog_update)
                .delete(protected::blog_delete),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/users", get(public::users_list).post(public::user_register))
        .route("/api/login", post(public::login_post))
}

/// Permissive when no origins are configured, otherwise an allow-list
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
