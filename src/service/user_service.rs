use crate::config::database::Database;
use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::dto::user_dto::RegisterUserDto;
use crate::entity::user::User;
use crate::error::api_error::ApiError;
use crate::error::db_error::DbError;
use crate::error::user_error::UserError;
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
pub struct UserService<U: UserRepositoryTrait = UserRepository> {
    user_repo: U,
}

impl UserService {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            user_repo: UserRepository::new(db_conn),
        }
    }
}

impl<U: UserRepositoryTrait> UserService<U> {
    #[cfg(test)]
    pub fn with_repo(user_repo: U) -> Self {
        Self { user_repo }
    }

    /// Uniqueness is case-insensitive: emails are stored and compared in
    /// this normalized form.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    pub async fn create_user(&self, payload: RegisterUserDto) -> Result<User, ApiError> {
        let email = Self::normalize_email(&payload.email);
        let name = payload.name.trim().to_string();

        // Validator already enforces lengths; blank-after-trim fields
        // still have to be rejected here.
        if email.is_empty() || name.is_empty() || payload.password.trim().is_empty() {
            return Err(UserError::MissingFields)?;
        }

        match self.user_repo.email_exists(&email).await {
            Ok(true) => return Err(UserError::EmailTaken)?,
            Ok(false) => {}
            Err(e) => {
                secure_log::secure_error!("Failed to check email existence", e);
                return Err(ApiError::Db(DbError::SomethingWentWrong(
                    "Failed to validate email".to_string(),
                )));
            }
        }

        let user_id = Uuid::now_v7();
        let password_hash = Self::hash_password(&payload.password)?;

        if let Err(e) = self.user_repo.insert(user_id, &email, &name, &password_hash).await {
            // Concurrent registrations can race past the existence check
            // and land on the unique email index instead
            if e.as_database_error().is_some_and(|db| db.is_unique_violation()) {
                return Err(UserError::EmailTaken)?;
            }
            secure_log::secure_error!("Failed to insert user", e);
            return Err(ApiError::Db(DbError::SomethingWentWrong(
                "User creation failed".to_string(),
            )));
        }

        match self.user_repo.find(user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ApiError::Db(DbError::SomethingWentWrong(
                "User creation failed".to_string(),
            ))),
            Err(e) => {
                secure_log::secure_error!("Failed to load user after insertion", e);
                Err(ApiError::Db(DbError::SomethingWentWrong(
                    "User creation failed".to_string(),
                )))
            }
        }
    }

    /// Slow adaptive hash; the cost factor comes from configuration and
    /// is clamped to a floor that resists offline brute force.
    pub fn hash_password(password: &str) -> Result<String, ApiError> {
        let cost = (parameter::get_u64("BCRYPT_COST") as u32).max(10);
        bcrypt::hash(password, cost).map_err(|e| {
            secure_log::secure_error!("Failed to hash password", e);
            ApiError::Db(DbError::SomethingWentWrong(
                "Password hashing failed".to_string(),
            ))
        })
    }

    pub fn verify_password(&self, user: &User, password: &str) -> bool {
        match bcrypt::verify(password, &user.password) {
            Ok(is_valid) => {
                if !is_valid {
                    secure_log::secure_error!(format!("Invalid password attempt for user ID: {}", user.id));
                }
                is_valid
            }
            Err(e) => {
                // Malformed stored hash; treat as mismatch rather than
                // leaking an internal error to the caller
                secure_log::secure_error!("Password verification system error", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::user_dto::RegisterUserDto;
    use crate::entity::user::User;
    use crate::repository::memory::duplicate_key_error;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    #[test]
    fn test_email_normalization() {
        assert_eq!(UserService::<UserRepository>::normalize_email("  A@X.Com "), "a@x.com");
        assert_eq!(UserService::<UserRepository>::normalize_email("a@x.com"), "a@x.com");
    }

    /// Repository where the existence check races: the email is reported
    /// free, but the insert lands on the unique index.
    #[derive(Clone)]
    struct RacyRepo;

    #[async_trait]
    impl UserRepositoryTrait for RacyRepo {
        async fn find(&self, _id: Uuid) -> Result<Option<User>, sqlx::Error> {
            Ok(None)
        }

        async fn find_by_email(&self, _email: &str) -> Option<User> {
            None
        }

        async fn email_exists(&self, _email: &str) -> Result<bool, sqlx::Error> {
            Ok(false)
        }

        async fn insert(
            &self,
            _id: Uuid,
            _email: &str,
            _name: &str,
            _password_hash: &str,
        ) -> Result<(), sqlx::Error> {
            Err(duplicate_key_error())
        }

        async fn mark_verified(&self, _id: Uuid) -> Result<(), sqlx::Error> {
            Ok(())
        }

        async fn set_reset_token(
            &self,
            _id: Uuid,
            _token_hash: &str,
            _expires_at: DateTime<Utc>,
        ) -> Result<(), sqlx::Error> {
            Ok(())
        }

        async fn update_password(&self, _id: Uuid, _password_hash: &str) -> Result<(), sqlx::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_insert_unique_violation_maps_to_email_taken() {
        parameter::init();
        crate::config::logging::tests::init_test_config();

        let service = UserService::with_repo(RacyRepo);
        let result = service
            .create_user(RegisterUserDto {
                email: "a@x.com".to_string(),
                name: "A".to_string(),
                password: "pw123456".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApiError::User(UserError::EmailTaken))));
    }
}
