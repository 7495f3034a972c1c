use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::user::User;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use std::sync::Arc;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, password, is_verified, reset_password_token, reset_password_expires, created_at, updated_at";

#[derive(Clone)]
pub struct UserRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl UserRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
pub trait UserRepositoryTrait: Clone + Send + Sync + 'static {
    async fn find(&self, id: Uuid) -> Result<Option<User>, Error>;
    /// Lookup by normalized (lower-cased, trimmed) email.
    async fn find_by_email(&self, email: &str) -> Option<User>;
    async fn email_exists(&self, email: &str) -> Result<bool, Error>;
    async fn insert(&self, id: Uuid, email: &str, name: &str, password_hash: &str) -> Result<(), Error>;
    async fn mark_verified(&self, id: Uuid) -> Result<(), Error>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error>;
    /// Stores the new password hash and clears any pending reset token,
    /// making the reset token single-use.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), Error>;
}

#[async_trait]
impl UserRepositoryTrait for UserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<User>, Error> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        match sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => Ok(user),
            Err(e) => {
                secure_log::secure_error!("User lookup by ID failed", e);
                Err(e)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);
        match sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(self.db_conn.get_pool())
            .await
        {
            Ok(user) => user,
            Err(e) => {
                secure_log::secure_error!("User lookup by email failed", e);
                None
            }
        }
    }

    async fn email_exists(&self, email: &str) -> Result<bool, Error> {
        match sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(self.db_conn.get_pool())
            .await
        {
            Ok(exists) => Ok(exists),
            Err(e) => {
                secure_log::secure_error!("Email existence check failed", e);
                Err(e)
            }
        }
    }

    async fn insert(&self, id: Uuid, email: &str, name: &str, password_hash: &str) -> Result<(), Error> {
        match sqlx::query(
            "INSERT INTO users (id, email, name, password, is_verified) VALUES ($1, $2, $3, $4, FALSE)",
        )
        .bind(id)
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .execute(self.db_conn.get_pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to insert user", e);
                Err(e)
            }
        }
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), Error> {
        // One-way transition; there is no path back to unverified
        match sqlx::query("UPDATE users SET is_verified = TRUE, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to mark user verified", e);
                Err(e)
            }
        }
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        match sqlx::query(
            "UPDATE users SET reset_password_token = $1, reset_password_expires = $2, updated_at = NOW() WHERE id = $3",
        )
        .bind(token_hash)
        .bind(expires_at)
        .bind(id)
        .execute(self.db_conn.get_pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to store password reset token", e);
                Err(e)
            }
        }
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), Error> {
        match sqlx::query(
            "UPDATE users SET password = $1, reset_password_token = NULL, reset_password_expires = NULL, updated_at = NOW() WHERE id = $2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(self.db_conn.get_pool())
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to update password", e);
                Err(e)
            }
        }
    }
}
