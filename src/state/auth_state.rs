use crate::config::database::Database;
use crate::repository::session_repository::{SessionRepository, SessionRepositoryTrait};
use crate::repository::user_repository::{UserRepository, UserRepositoryTrait};
use crate::service::mail_service::MailService;
use crate::service::token_service::TokenService;
use crate::service::user_service::UserService;
use std::sync::Arc;

/// Generic over the repository traits so the auth handlers can be
/// exercised against in-memory stores; production uses the defaults.
#[derive(Clone)]
pub struct AuthState<U = UserRepository, S = SessionRepository>
where
    U: UserRepositoryTrait,
    S: SessionRepositoryTrait,
{
    pub(crate) token_service: TokenService,
    pub(crate) user_service: UserService<U>,
    pub(crate) user_repo: U,
    pub(crate) session_repo: S,
    pub(crate) mail_service: MailService,
}

impl AuthState {
    pub fn new(db_conn: &Arc<Database>, token_service: TokenService, mail_service: MailService) -> Self {
        Self {
            token_service,
            user_service: UserService::new(db_conn),
            user_repo: UserRepository::new(db_conn),
            session_repo: SessionRepository::new(db_conn),
            mail_service,
        }
    }
}
