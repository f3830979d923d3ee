//! HTTP route definitions

use crate::{handlers, middleware, AppState};
use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use docs_hub_storage::share_link::SHARE_ROUTE_PREFIX;
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Create the main router
pub fn create_router(state: Arc<AppState>) -> Router {
    let cloud = Router::new()
        // Bucket endpoints
        .route("/buckets", get(handlers::list_buckets))
        .route("/bucket", put(handlers::create_bucket))
        .route("/{bucket}", delete(handlers::remove_bucket))
        // File endpoints
        .route("/{bucket}/files", post(handlers::get_files))
        .route("/{bucket}/file/copy", post(handlers::copy_file))
        .route("/{bucket}/file/move", post(handlers::move_file))
        .route("/{bucket}/file/upload", put(handlers::upload_files))
        .route("/{bucket}/file/download", post(handlers::download_file))
        .route("/{bucket}/file/remove", delete(handlers::remove_file))
        .route("/{bucket}/file/share", post(handlers::share_file))
        .method_not_allowed_fallback(handlers::method_not_allowed);

    let mut router = Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/cloud", cloud);

    if state.share_links.is_some() {
        router = router.route(
            &format!("{}/{{bucket}}/{{*key}}", SHARE_ROUTE_PREFIX),
            get(handlers::open_shared_link),
        );
    }

    let server = &state.config.server;
    let router = router
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(axum_middleware::map_response(middleware::error_envelope))
        .layer(DefaultBodyLimit::max(server.max_body_size));

    let router = if server.cors_enabled {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
                .expose_headers(Any),
        )
    } else {
        router
    };

    router.with_state(state)
}
