use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenError {
    /// Bad signature, malformed token, or expired. Also covers a
    /// reset-password token whose stored hash no longer matches.
    #[error("Invalid or expired token")]
    TokenInvalid,
    #[error("Invalid or expired access token")]
    Unauthenticated,
    #[error("Refresh token missing")]
    MissingRefreshToken,
    #[error("Token error: {0}")]
    TokenCreation(String),
    #[error("Signing secret '{0}' is not configured")]
    MissingSecret(&'static str),
    #[error("Signing secret '{0}' must be at least 32 bytes")]
    WeakSecret(&'static str),
}

impl IntoResponse for TokenError {
    fn into_response(self) -> Response {
        let status_code = match self {
            TokenError::TokenInvalid => StatusCode::BAD_REQUEST,
            TokenError::Unauthenticated => StatusCode::UNAUTHORIZED,
            TokenError::MissingRefreshToken => StatusCode::UNAUTHORIZED,
            TokenError::TokenCreation(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TokenError::MissingSecret(_) => StatusCode::INTERNAL_SERVER_ERROR,
            TokenError::WeakSecret(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
