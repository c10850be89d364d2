// src/models/user.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;

use crate::models::session::UserSession;

pub const ACTIVE: &str = "true";
pub const INACTIVE: &str = "false";

/// Only the literal string `"true"` counts as active.
pub fn is_active_flag(ativo: &str) -> bool {
    ativo == ACTIVE
}

/// A row of the `user` table.
#[derive(Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub unique_id: String,
    pub name: String,
    pub email: String,
    pub ativo: String,
    /// bcrypt hash.
    pub senha: String,
    pub cpf_cnpj: Option<String>,
}

impl User {
    pub fn is_active(&self) -> bool {
        is_active_flag(&self.ativo)
    }

    /// Drops the password credential.
    pub fn into_session(self) -> UserSession {
        UserSession {
            unique_id: Some(self.unique_id),
            name: self.name,
            email: self.email,
            ativo: Some(self.ativo),
            role: None,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("unique_id", &self.unique_id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("ativo", &self.ativo)
            .field("senha", &"<redacted>")
            .field("cpf_cnpj", &self.cpf_cnpj)
            .finish()
    }
}

/// A user row as shown on the admin client screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Client {
    pub unique_id: String,
    pub name: String,
    pub email: String,
    pub ativo: String,
    pub active: bool,
    pub document: String,
}

impl From<User> for Client {
    fn from(user: User) -> Self {
        let active = user.is_active();
        let document = user
            .cpf_cnpj
            .filter(|doc| !doc.trim().is_empty())
            .unwrap_or_else(|| "Não informado".to_string());
        Client {
            unique_id: user.unique_id,
            name: user.name,
            email: user.email,
            ativo: user.ativo,
            active,
            document,
        }
    }
}
