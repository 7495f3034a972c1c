use crate::service::token_service::TokenService;

/// State for the auth middleware. Deliberately holds only the token
/// service: the access-token gate never consults the database.
#[derive(Clone)]
pub struct TokenState {
    pub token_service: TokenService,
}

impl TokenState {
    pub fn new(token_service: TokenService) -> Self {
        Self { token_service }
    }
}
