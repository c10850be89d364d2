// src/routes/admin.rs
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Json, Path},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::session::{AdminSession, UserSession};
use crate::models::user::Client;
use crate::routes::admin_token;
use crate::services::admin as admin_service;
use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AdminLoginResponse {
    token: String,
    name: String,
    email: String,
}

#[derive(Serialize)]
pub struct ToolsSessionResponse {
    token: String,
    user: UserSession,
}

/// Admin route guard. A valid admin session ends up in the request extensions.
pub async fn admin_middleware(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = admin_token(req.headers());
    let session = admin_service::check_admin_session(
        &app_state.config,
        &app_state.sessions,
        token.as_deref(),
        Utc::now().timestamp_millis(),
    )
    .await
    .ok_or_else(AppError::admin_session_required)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<AdminLoginRequest>, JsonRejection>,
) -> Result<Json<AdminLoginResponse>, AppError> {
    let Json(payload) = payload?;
    let (token, session) = admin_service::admin_sign_in(
        &app_state.config,
        &app_state.sessions,
        payload.email.trim(),
        &payload.password,
        Utc::now().timestamp_millis(),
    )
    .await?;
    Ok(Json(AdminLoginResponse {
        token,
        name: session.name,
        email: session.email,
    }))
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = admin_token(&headers);
    admin_service::admin_sign_out(&app_state.sessions, token.as_deref()).await;
    StatusCode::NO_CONTENT
}

pub async fn session(Extension(session): Extension<AdminSession>) -> Json<AdminSession> {
    Json(session)
}

pub async fn tools_session(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(admin): Extension<AdminSession>,
) -> Result<Json<ToolsSessionResponse>, AppError> {
    let (token, user) = admin_service::tools_session(&app_state.sessions, &admin)?;
    Ok(Json(ToolsSessionResponse { token, user }))
}

pub async fn list_clients(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Client>>, AppError> {
    Ok(Json(admin_service::list_clients(app_state.users.as_ref()).await?))
}

pub async fn toggle_client(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(unique_id): Path<String>,
) -> Result<Json<Client>, AppError> {
    Ok(Json(
        admin_service::toggle_client(app_state.users.as_ref(), &unique_id).await?,
    ))
}
