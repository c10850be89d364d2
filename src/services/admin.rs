// src/services/admin.rs
// Admin sign-in, the admin session guard and the client screens.

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::session::{AdminSession, UserSession};
use crate::models::user::{is_active_flag, Client, ACTIVE, INACTIVE};
use crate::services::auth::verify_password;
use crate::services::session::SessionStore;
use crate::services::users::UserDirectory;

pub const ADMIN_BAD_CREDENTIALS: &str = "Credenciais de administrador inválidas.";
const TOOLS_SESSION_NAME: &str = "Administrador do Sistema";

/// Returns the saved admin session and its token.
pub async fn admin_sign_in(
    config: &Config,
    sessions: &SessionStore,
    email: &str,
    password: &str,
    now_ms: i64,
) -> AppResult<(String, AdminSession)> {
    let (admin_email, password_hash) = config.admin_credentials()?;

    let password_ok = verify_password(password, password_hash).await;
    if email != admin_email || !password_ok {
        tracing::info!("admin sign-in rejected");
        return Err(AppError::Unauthorized {
            message: ADMIN_BAD_CREDENTIALS.to_string(),
            redirect: crate::error::ADMIN_LOGIN_PATH,
        });
    }

    let session = AdminSession {
        email: admin_email.to_string(),
        is_admin: true,
        name: config.admin_name.clone(),
        timestamp: now_ms,
    };
    let token = sessions.save(&session)?;
    tracing::info!("admin signed in");
    Ok((token, session))
}

/// Fails closed: missing session, wrong email or an expired session all yield `None`.
/// An expired session is cleared on the spot.
pub async fn check_admin_session(
    config: &Config,
    sessions: &SessionStore,
    token: Option<&str>,
    now_ms: i64,
) -> Option<AdminSession> {
    let session = sessions.load::<AdminSession>(token).await?;

    if !session.is_admin || config.admin_email.as_deref() != Some(session.email.as_str()) {
        tracing::warn!("admin session does not match the configured admin");
        return None;
    }

    if session.is_expired(now_ms) {
        tracing::info!("admin session expired");
        sessions.clear::<AdminSession>(token).await;
        return None;
    }

    Some(session)
}

pub async fn admin_sign_out(sessions: &SessionStore, token: Option<&str>) {
    sessions.clear::<AdminSession>(token).await;
}

/// A user session for the admin, so the tool dashboard opens through the user guard.
pub fn tools_session(
    sessions: &SessionStore,
    admin: &AdminSession,
) -> AppResult<(String, UserSession)> {
    let name = if admin.name.trim().is_empty() {
        TOOLS_SESSION_NAME.to_string()
    } else {
        admin.name.clone()
    };
    let session = UserSession {
        unique_id: None,
        name,
        email: admin.email.clone(),
        ativo: None,
        role: Some("admin".to_string()),
    };
    let token = sessions.save(&session)?;
    Ok((token, session))
}

pub async fn list_clients(users: &dyn UserDirectory) -> AppResult<Vec<Client>> {
    let rows = users.list().await?;
    Ok(rows.into_iter().map(Client::from).collect())
}

/// Flips the active flag between `"true"` and `"false"`.
pub async fn toggle_client(users: &dyn UserDirectory, unique_id: &str) -> AppResult<Client> {
    let not_found = || AppError::NotFound("Cliente não encontrado.".to_string());

    let current = users.find_by_id(unique_id).await?.ok_or_else(not_found)?;
    let next = if is_active_flag(&current.ativo) { INACTIVE } else { ACTIVE };

    let updated = users.set_active(unique_id, next).await?.ok_or_else(not_found)?;
    tracing::info!(unique_id, ativo = next, "client status changed");
    Ok(Client::from(updated))
}
