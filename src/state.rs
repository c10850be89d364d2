// src/state.rs
use std::sync::Arc;

use crate::config::Config;
use crate::services::session::SessionStore;
use crate::services::users::UserDirectory;
use crate::services::webhook::WebhookClient;

/// Shared application state, handed to handlers as an `Extension<Arc<AppState>>`.
pub struct AppState {
    pub config: Config,
    pub users: Arc<dyn UserDirectory>,
    pub sessions: SessionStore,
    pub webhook: WebhookClient,
}

impl AppState {
    pub fn new(config: Config, users: Arc<dyn UserDirectory>) -> Result<Self, reqwest::Error> {
        let webhook = WebhookClient::new(&config)?;
        let sessions = SessionStore::new(config.jwt_secret.as_bytes());
        Ok(AppState { config, users, sessions, webhook })
    }
}
