use crate::config::database::{Database, DatabaseTrait};
use crate::config::logging::secure_log;
use crate::entity::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct SessionRepository {
    pub(crate) db_conn: Arc<Database>,
}

impl SessionRepository {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            db_conn: Arc::clone(db_conn),
        }
    }
}

#[async_trait]
pub trait SessionRepositoryTrait: Clone + Send + Sync + 'static {
    /// Creates the session row with an empty refresh token placeholder;
    /// the real token is stored once it has been signed with the new id.
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session, Error>;
    async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), Error>;
    async fn find(&self, id: Uuid) -> Result<Option<Session>, Error>;
    /// Compare-and-swap rotation: the overwrite only happens when the
    /// stored token still equals the presented one, so concurrent
    /// refreshes on the same session resolve to a single winner.
    /// Returns false when the swap lost (stored value already rotated).
    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        presented_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error>;
    async fn delete(&self, id: Uuid) -> Result<(), Error>;
    /// Forced logout of every device, used after a password reset.
    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, Error>;
    async fn delete_expired(&self) -> Result<u64, Error>;
}

#[async_trait]
impl SessionRepositoryTrait for SessionRepository {
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session, Error> {
        let id = Uuid::now_v7();
        match sqlx::query_as::<_, Session>(
            "INSERT INTO sessions (id, user_id, refresh_token, expires_at) VALUES ($1, $2, '', $3) \
             RETURNING id, user_id, refresh_token, expires_at, created_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(self.db_conn.get_pool())
        .await
        {
            Ok(session) => Ok(session),
            Err(e) => {
                secure_log::secure_error!("Failed to create session", e);
                Err(e)
            }
        }
    }

    async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), Error> {
        match sqlx::query("UPDATE sessions SET refresh_token = $1 WHERE id = $2")
            .bind(refresh_token)
            .bind(id)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to store refresh token on session", e);
                Err(e)
            }
        }
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, Error> {
        match sqlx::query_as::<_, Session>(
            "SELECT id, user_id, refresh_token, expires_at, created_at FROM sessions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.db_conn.get_pool())
        .await
        {
            Ok(session) => Ok(session),
            Err(e) => {
                secure_log::secure_error!("Session lookup failed", e);
                Err(e)
            }
        }
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        presented_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        match sqlx::query(
            "UPDATE sessions SET refresh_token = $1, expires_at = $2 \
             WHERE id = $3 AND refresh_token = $4",
        )
        .bind(new_token)
        .bind(expires_at)
        .bind(id)
        .bind(presented_token)
        .execute(self.db_conn.get_pool())
        .await
        {
            Ok(result) => Ok(result.rows_affected() == 1),
            Err(e) => {
                secure_log::secure_error!("Refresh token rotation failed", e);
                Err(e)
            }
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        match sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                secure_log::secure_error!("Failed to delete session", e);
                Err(e)
            }
        }
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, Error> {
        match sqlx::query("DELETE FROM sessions WHERE user_id = $1")
            .bind(user_id)
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) => {
                secure_log::secure_error!("Failed to delete sessions for user", e);
                Err(e)
            }
        }
    }

    async fn delete_expired(&self) -> Result<u64, Error> {
        match sqlx::query("DELETE FROM sessions WHERE expires_at < NOW()")
            .execute(self.db_conn.get_pool())
            .await
        {
            Ok(result) => Ok(result.rows_affected()),
            Err(e) => {
                secure_log::secure_error!("Failed to sweep expired sessions", e);
                Err(e)
            }
        }
    }
}

/// Background sweep of expired session rows with graceful shutdown.
/// Expired sessions are already rejected at refresh time; the sweep only
/// keeps the table from accumulating dead rows.
pub fn start_session_sweeper(
    repo: SessionRepository,
    interval_minutes: u64,
    shutdown_token: CancellationToken,
) -> JoinHandle<()> {
    let interval_duration = std::time::Duration::from_secs(interval_minutes * 60);

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval_duration);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match repo.delete_expired().await {
                        Ok(swept) => {
                            if swept > 0 {
                                info!("Swept {} expired sessions", swept);
                            }
                        }
                        Err(e) => {
                            tracing::error!("Error during session sweep: {}", e);
                        }
                    }
                }
                _ = shutdown_token.cancelled() => {
                    info!("Session sweeper received shutdown signal, stopping gracefully");
                    break;
                }
            }
        }

        info!("Session sweeper stopped");
    })
}
