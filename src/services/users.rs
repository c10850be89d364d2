use async_trait::async_trait;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::models::user::User;

const USER_COLUMNS: &str = "unique_id, name, email, ativo, senha, cpf_cnpj";

/// Access to the `user` table, keyed by `unique_id`.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Every row with this email; callers decide what more than one means.
    async fn find_by_email(&self, email: &str) -> AppResult<Vec<User>>;

    async fn find_by_id(&self, unique_id: &str) -> AppResult<Option<User>>;

    async fn list(&self) -> AppResult<Vec<User>>;

    /// Writes the active flag and returns the updated row, if any.
    async fn set_active(&self, unique_id: &str, ativo: &str) -> AppResult<Option<User>>;
}

pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_email(&self, email: &str) -> AppResult<Vec<User>> {
        // Two rows are enough to tell "exactly one" apart from "ambiguous".
        let query = format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE email = $1 LIMIT 2"#);
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn find_by_id(&self, unique_id: &str) -> AppResult<Option<User>> {
        let query = format!(r#"SELECT {USER_COLUMNS} FROM "user" WHERE unique_id = $1"#);
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(unique_id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        let query = format!(r#"SELECT {USER_COLUMNS} FROM "user" ORDER BY name"#);
        Ok(sqlx::query_as::<_, User>(&query).fetch_all(&self.pool).await?)
    }

    async fn set_active(&self, unique_id: &str, ativo: &str) -> AppResult<Option<User>> {
        let query = format!(
            r#"UPDATE "user" SET ativo = $1 WHERE unique_id = $2 RETURNING {USER_COLUMNS}"#
        );
        Ok(sqlx::query_as::<_, User>(&query)
            .bind(ativo)
            .bind(unique_id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

/// Stands in when `DATABASE_URL` is not set: every call reports the missing configuration.
pub struct UnconfiguredDirectory;

impl UnconfiguredDirectory {
    fn error() -> AppError {
        AppError::Configuration(
            "Base de usuários não configurada. Contate o suporte técnico.".to_string(),
        )
    }
}

#[async_trait]
impl UserDirectory for UnconfiguredDirectory {
    async fn find_by_email(&self, _email: &str) -> AppResult<Vec<User>> {
        Err(Self::error())
    }

    async fn find_by_id(&self, _unique_id: &str) -> AppResult<Option<User>> {
        Err(Self::error())
    }

    async fn list(&self) -> AppResult<Vec<User>> {
        Err(Self::error())
    }

    async fn set_active(&self, _unique_id: &str, _ativo: &str) -> AppResult<Option<User>> {
        Err(Self::error())
    }
}
