use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bcrypt::verify;
use serde::Serialize;

use crate::error::AppError;
use crate::models::session::UserSession;
use crate::services::session::SessionStore;
use crate::services::users::UserDirectory;

pub const USER_NOT_FOUND: &str = "Usuário não encontrado ou credenciais inválidas.";
pub const USER_INACTIVE: &str = "Seu usuário está inativo, contate o time responsável pelo sistema para obter mais informações.";
pub const BAD_CREDENTIALS: &str = "Email ou senha incorretos.";
pub const SIGN_IN_FAILED: &str = "Ocorreu um erro ao processar o login. Tente novamente.";

/// Result of a sign-in attempt. Each failure kind carries its own message.
#[derive(Debug)]
pub enum SignInOutcome {
    Success { token: String, user: UserSession },
    Inactive { message: String },
    Error { message: String },
}

impl SignInOutcome {
    fn error(message: impl Into<String>) -> Self {
        SignInOutcome::Error { message: message.into() }
    }
}

#[derive(Serialize)]
struct SignInBody<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<&'a UserSession>,
}

impl IntoResponse for SignInOutcome {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            SignInOutcome::Success { token, user } => (
                StatusCode::OK,
                SignInBody {
                    success: true,
                    user_active: Some(true),
                    message: None,
                    token: Some(token),
                    user: Some(user),
                },
            ),
            SignInOutcome::Inactive { message } => (
                StatusCode::FORBIDDEN,
                SignInBody {
                    success: false,
                    user_active: Some(false),
                    message: Some(message),
                    token: None,
                    user: None,
                },
            ),
            SignInOutcome::Error { message } => (
                StatusCode::UNAUTHORIZED,
                SignInBody {
                    success: false,
                    user_active: None,
                    message: Some(message),
                    token: None,
                    user: None,
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Checks the credentials against the user table and, on success, persists the
/// user without its password.
///
/// The active flag is checked before the password, so inactive accounts get
/// the inactive message whatever password was typed.
pub async fn sign_in(
    users: &dyn UserDirectory,
    sessions: &SessionStore,
    email: &str,
    password: &str,
) -> SignInOutcome {
    let mut rows = match users.find_by_email(email).await {
        Ok(rows) => rows,
        Err(AppError::Configuration(message)) => return SignInOutcome::error(message),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed during sign-in");
            return SignInOutcome::error(SIGN_IN_FAILED);
        }
    };

    let user = match (rows.pop(), rows.is_empty()) {
        (Some(user), true) => user,
        (None, _) => {
            tracing::info!("sign-in rejected: unknown email");
            return SignInOutcome::error(USER_NOT_FOUND);
        }
        (Some(_), false) => {
            tracing::warn!("sign-in rejected: email matches several users");
            return SignInOutcome::error(USER_NOT_FOUND);
        }
    };

    if !user.is_active() {
        tracing::info!(unique_id = %user.unique_id, "sign-in rejected: inactive user");
        return SignInOutcome::Inactive { message: USER_INACTIVE.to_string() };
    }

    if !verify_password(password, &user.senha).await {
        tracing::info!(unique_id = %user.unique_id, "sign-in rejected: wrong password");
        return SignInOutcome::error(BAD_CREDENTIALS);
    }

    let session = user.into_session();
    match sessions.save(&session) {
        Ok(token) => {
            tracing::info!(email = %session.email, "user signed in");
            SignInOutcome::Success { token, user: session }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to persist user session");
            SignInOutcome::error(SIGN_IN_FAILED)
        }
    }
}

/// Runs the bcrypt check on the blocking pool. An unreadable hash never matches.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let (password, hash) = (password.to_owned(), hash.to_owned());
    match tokio::task::spawn_blocking(move || verify(password, &hash)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        }
        Err(e) => {
            tracing::error!(error = %e, "password check did not complete");
            false
        }
    }
}

pub async fn sign_out(sessions: &SessionStore, token: Option<&str>) {
    sessions.clear::<UserSession>(token).await;
}

pub async fn current_user(sessions: &SessionStore, token: Option<&str>) -> Option<UserSession> {
    sessions.load::<UserSession>(token).await
}
