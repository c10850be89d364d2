// src/error.rs
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::session::SessionError;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_LOGIN_PATH: &str = "/admin-login";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("{0}")]
    Configuration(String),

    #[error("{message}")]
    Unauthorized {
        message: String,
        redirect: &'static str,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    Upstream(String),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),
}

impl AppError {
    pub fn user_session_required() -> Self {
        AppError::Unauthorized {
            message: "Sessão expirada ou inexistente. Faça login novamente.".to_string(),
            redirect: LOGIN_PATH,
        }
    }

    pub fn admin_session_required() -> Self {
        AppError::Unauthorized {
            message: "Acesso restrito a administradores.".to_string(),
            redirect: ADMIN_LOGIN_PATH,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Configuration(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "rejected request body");
        AppError::InvalidInput("Requisição inválida. Envie email e senha em JSON.".to_string())
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, redirect) = match self {
            AppError::Database(e) => {
                tracing::error!(error = %e, "database request failed");
                ("Erro ao acessar a base de usuários.".to_string(), None)
            }
            AppError::Session(e) => {
                tracing::error!(error = %e, "session store failure");
                ("Falha ao registrar a sessão.".to_string(), None)
            }
            AppError::Unauthorized { message, redirect } => (message, Some(redirect)),
            other => (other.to_string(), None),
        };
        (status, Json(ErrorResponse { message, redirect })).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
