// src/config.rs
use dotenv::dotenv;
use std::env;

use crate::error::{AppError, AppResult};

pub const DEFAULT_UPLOAD_WEBHOOK_URL: &str = "https://webhookn8n.altivus-ai.com/webhook/recebe-dados";
pub const DEFAULT_DASHBOARD_WEBHOOK_URL: &str =
    "https://webhookn8n.altivus-ai.com/webhook/1739283086997x983901976261336800/dashboard";

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    /// Missing means every user-table call fails with a configuration error.
    pub database_url: Option<String>,
    pub admin_email: Option<String>,
    /// bcrypt hash of the admin password.
    pub admin_password_hash: Option<String>,
    pub admin_name: String,
    pub upload_webhook_url: String,
    pub dashboard_webhook_url: String,
    pub webhook_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the config from any variable source; `from_env` passes the process environment.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, env::VarError> {
        let non_empty = |key: &str| var(key).filter(|value| !value.trim().is_empty());
        Ok(Config {
            jwt_secret: var("JWT_SECRET").ok_or(env::VarError::NotPresent)?,
            database_url: non_empty("DATABASE_URL"),
            admin_email: non_empty("ADMIN_EMAIL"),
            admin_password_hash: non_empty("ADMIN_PASSWORD_HASH"),
            admin_name: non_empty("ADMIN_NAME").unwrap_or_else(|| "Administrador".to_string()),
            upload_webhook_url: non_empty("UPLOAD_WEBHOOK_URL")
                .unwrap_or_else(|| DEFAULT_UPLOAD_WEBHOOK_URL.to_string()),
            dashboard_webhook_url: non_empty("DASHBOARD_WEBHOOK_URL")
                .unwrap_or_else(|| DEFAULT_DASHBOARD_WEBHOOK_URL.to_string()),
            webhook_timeout_secs: parsed(var("WEBHOOK_TIMEOUT_SECS"), 30),
            max_upload_bytes: upload_limit_bytes(parsed(var("MAX_UPLOAD_MB"), 50)),
            server_host: var("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            server_port: parsed(var("SERVER_PORT"), 3000),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Admin email and password hash, or the configuration error shown at the login form.
    pub fn admin_credentials(&self) -> AppResult<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password_hash.as_deref()) {
            (Some(email), Some(hash)) => Ok((email, hash)),
            _ => Err(AppError::Configuration(
                "Credenciais de administrador não configuradas. Contate o suporte técnico.".to_string(),
            )),
        }
    }
}

fn parsed<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// `MAX_UPLOAD_MB` in bytes, clamped instead of overflowing.
fn upload_limit_bytes(megabytes: usize) -> usize {
    megabytes.saturating_mul(1024 * 1024)
}
