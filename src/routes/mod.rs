// src/routes/mod.rs
pub mod admin;
pub mod auth;
pub mod offboarding;
pub mod tools;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderMap},
    middleware,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// Header carrying the admin session token. The user session travels as `Authorization: Bearer`.
pub const ADMIN_SESSION_HEADER: &str = "x-admin-session";

pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn admin_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(ADMIN_SESSION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

pub fn create_router(max_upload_bytes: usize) -> Router {
    let public = Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/admin/login", post(admin::login))
        .route("/admin/logout", post(admin::logout));

    let user = Router::new()
        .route("/me", get(auth::me))
        .route("/tools", get(tools::list))
        .route(
            "/offboarding/upload",
            post(offboarding::upload).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route("/offboarding/dashboard", get(offboarding::dashboard))
        .route_layer(middleware::from_fn(auth::auth_middleware));

    let admin = Router::new()
        .route("/admin/session", get(admin::session))
        .route("/admin/tools-session", post(admin::tools_session))
        .route("/admin/clients", get(admin::list_clients))
        .route("/admin/clients/:unique_id/toggle", post(admin::toggle_client))
        .route_layer(middleware::from_fn(admin::admin_middleware));

    public.merge(user).merge(admin)
}

/// The full application: the API under `/api` plus `/health`, wrapped in tracing and CORS layers.
pub fn create_app(app_state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", create_router(app_state.config.max_upload_bytes))
        .route("/health", get(|| async { "ok" }))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(Extension(app_state))
}
