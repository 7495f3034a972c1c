//! In-memory repository doubles for handler tests. They honor the same
//! contracts as the Postgres-backed repositories (verbatim refresh-token
//! storage, compare-and-swap rotation, unique email) without a pool.

use crate::entity::session::Session;
use crate::entity::user::User;
use crate::repository::session_repository::SessionRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::Error;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Mirrors a Postgres duplicate-key failure on the unique email index.
#[derive(Debug)]
pub struct DuplicateKey;

impl std::fmt::Display for DuplicateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("duplicate key value violates unique constraint")
    }
}

impl std::error::Error for DuplicateKey {}

impl sqlx::error::DatabaseError for DuplicateKey {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint"
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::UniqueViolation
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }
}

pub fn duplicate_key_error() -> Error {
    Error::Database(Box::new(DuplicateKey))
}

#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    rows: Arc<Mutex<HashMap<Uuid, User>>>,
}

#[async_trait]
impl UserRepositoryTrait for InMemoryUserRepository {
    async fn find(&self, id: Uuid) -> Result<Option<User>, Error> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        self.rows
            .lock()
            .unwrap()
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    async fn email_exists(&self, email: &str) -> Result<bool, Error> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .any(|user| user.email == email))
    }

    async fn insert(&self, id: Uuid, email: &str, name: &str, password_hash: &str) -> Result<(), Error> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|user| user.email == email) {
            return Err(duplicate_key_error());
        }
        let now = Utc::now();
        rows.insert(
            id,
            User {
                id,
                email: email.to_string(),
                name: name.to_string(),
                password: password_hash.to_string(),
                is_verified: false,
                reset_password_token: None,
                reset_password_expires: None,
                created_at: now,
                updated_at: now,
            },
        );
        Ok(())
    }

    async fn mark_verified(&self, id: Uuid) -> Result<(), Error> {
        if let Some(user) = self.rows.lock().unwrap().get_mut(&id) {
            user.is_verified = true;
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), Error> {
        if let Some(user) = self.rows.lock().unwrap().get_mut(&id) {
            user.reset_password_token = Some(token_hash.to_string());
            user.reset_password_expires = Some(expires_at);
            user.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<(), Error> {
        if let Some(user) = self.rows.lock().unwrap().get_mut(&id) {
            user.password = password_hash.to_string();
            user.reset_password_token = None;
            user.reset_password_expires = None;
            user.updated_at = Utc::now();
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct InMemorySessionRepository {
    rows: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl InMemorySessionRepository {
    pub fn count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionRepositoryTrait for InMemorySessionRepository {
    async fn create(&self, user_id: Uuid, expires_at: DateTime<Utc>) -> Result<Session, Error> {
        let session = Session {
            id: Uuid::now_v7(),
            user_id,
            refresh_token: String::new(),
            expires_at,
            created_at: Utc::now(),
        };
        self.rows.lock().unwrap().insert(session.id, session.clone());
        Ok(session)
    }

    async fn set_refresh_token(&self, id: Uuid, refresh_token: &str) -> Result<(), Error> {
        if let Some(session) = self.rows.lock().unwrap().get_mut(&id) {
            session.refresh_token = refresh_token.to_string();
        }
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Session>, Error> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn rotate_refresh_token(
        &self,
        id: Uuid,
        presented_token: &str,
        new_token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, Error> {
        let mut rows = self.rows.lock().unwrap();
        match rows.get_mut(&id) {
            Some(session) if session.refresh_token == presented_token => {
                session.refresh_token = new_token.to_string();
                session.expires_at = expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), Error> {
        self.rows.lock().unwrap().remove(&id);
        Ok(())
    }

    async fn delete_all_for_user(&self, user_id: Uuid) -> Result<u64, Error> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, session| session.user_id != user_id);
        Ok((before - rows.len()) as u64)
    }

    async fn delete_expired(&self) -> Result<u64, Error> {
        let now = Utc::now();
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, session| session.expires_at >= now);
        Ok((before - rows.len()) as u64)
    }
}
