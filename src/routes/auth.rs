// src/routes/auth.rs
use axum::{
    body::Body,
    extract::{rejection::JsonRejection, Json},
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Extension,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::AppError;
use crate::models::session::UserSession;
use crate::routes::bearer_token;
use crate::services::auth::{self as auth_service, SignInOutcome};
use crate::state::AppState;

#[derive(Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Lets the request through only with a loaded user session, which handlers
/// then read as `Extension<UserSession>`.
pub async fn auth_middleware(
    Extension(app_state): Extension<Arc<AppState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers());
    let session = auth_service::current_user(&app_state.sessions, token.as_deref())
        .await
        .ok_or_else(AppError::user_session_required)?;

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<SignInOutcome, AppError> {
    let Json(payload) = payload?;
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(AppError::InvalidInput("Preencha email e senha.".to_string()));
    }

    Ok(auth_service::sign_in(
        app_state.users.as_ref(),
        &app_state.sessions,
        email,
        &payload.password,
    )
    .await)
}

pub async fn logout(
    Extension(app_state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let token = bearer_token(&headers);
    auth_service::sign_out(&app_state.sessions, token.as_deref()).await;
    StatusCode::NO_CONTENT
}

pub async fn me(Extension(session): Extension<UserSession>) -> Json<UserSession> {
    Json(session)
}
