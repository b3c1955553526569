//! Route definitions for the PromoHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = state.config.storage.max_upload_size_bytes as usize;

    let api_routes = Router::new()
        .merge(node_routes())
        .merge(site_routes())
        .merge(auth_user_routes())
        .merge(health_routes());

    let cors = build_cors_layer(&state);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Node hierarchy: tree, CRUD, upload, reorder, duplicate, archive
fn node_routes() -> Router<AppState> {
    Router::new()
        .route("/nodes/tree", get(handlers::node::get_tree))
        .route("/nodes/recent", get(handlers::node::recent_files))
        .route("/nodes/search", get(handlers::node::search_nodes))
        .route("/nodes/children", get(handlers::node::list_root_children))
        .route(
            "/nodes/directories",
            post(handlers::node::create_directory),
        )
        .route("/nodes/files", post(handlers::node::upload_files))
        .route("/nodes/order", put(handlers::node::reorder_nodes))
        .route("/nodes/{id}", get(handlers::node::get_node))
        .route("/nodes/{id}", put(handlers::node::rename_node))
        .route("/nodes/{id}", delete(handlers::node::delete_node))
        .route("/nodes/{id}/children", get(handlers::node::list_children))
        .route(
            "/nodes/{id}/duplicate",
            post(handlers::node::duplicate_node),
        )
        .route("/nodes/{id}/archive", get(handlers::node::download_archive))
}

/// Bookmark site CRUD
fn site_routes() -> Router<AppState> {
    Router::new()
        .route("/sites", get(handlers::site::list_sites))
        .route("/sites", post(handlers::site::create_site))
        .route("/sites/{id}", put(handlers::site::update_site))
        .route("/sites/{id}", delete(handlers::site::delete_site))
}

/// Authorized-user listing
fn auth_user_routes() -> Router<AppState> {
    Router::new().route("/auth-users", get(handlers::auth_user::list_auth_users))
}

/// Health check endpoints (no auth required)
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health_check))
}

/// Build CORS layer from configuration
fn build_cors_layer(state: &AppState) -> CorsLayer {
    use axum::http::{HeaderValue, Method};
    use tower_http::cors::Any;

    let cors_config = &state.config.server.cors;

    let mut cors = CorsLayer::new();

    if cors_config.allowed_origins.contains(&"*".to_string()) {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<HeaderValue> = cors_config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    let methods: Vec<Method> = cors_config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    cors = cors.allow_methods(methods);

    if cors_config.allowed_headers.contains(&"*".to_string()) {
        cors = cors.allow_headers(Any);
    }

    cors.max_age(std::time::Duration::from_secs(
        cors_config.max_age_seconds,
    ))
}
