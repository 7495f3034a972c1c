use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("A user with this email already exists")]
    EmailTaken,
    /// Deliberately generic: never reveals whether the email or the
    /// password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email is not verified, please verify your mail")]
    EmailNotVerified,
    #[error("Email already verified")]
    AlreadyVerified,
    #[error("User not found")]
    UserNotFound,
    #[error("All fields are required")]
    MissingFields,
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let status_code = match self {
            UserError::EmailTaken => StatusCode::CONFLICT,
            UserError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            UserError::EmailNotVerified => StatusCode::BAD_REQUEST,
            UserError::AlreadyVerified => StatusCode::BAD_REQUEST,
            UserError::UserNotFound => StatusCode::NOT_FOUND,
            UserError::MissingFields => StatusCode::BAD_REQUEST,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
