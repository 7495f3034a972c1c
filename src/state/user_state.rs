use crate::config::database::Database;
use crate::repository::user_repository::UserRepository;
use std::sync::Arc;

#[derive(Clone)]
pub struct UserState {
    pub(crate) user_repo: UserRepository,
}

impl UserState {
    pub fn new(db_conn: &Arc<Database>) -> Self {
        Self {
            user_repo: UserRepository::new(db_conn),
        }
    }
}
