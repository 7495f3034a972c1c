use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    /// No session row for the presented token, or the stored refresh
    /// token string differs from the presented one (rotation replay).
    #[error("Invalid session")]
    InvalidSession,
    #[error("Session expired")]
    SessionExpired,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let status_code = match self {
            SessionError::InvalidSession => StatusCode::BAD_REQUEST,
            SessionError::SessionExpired => StatusCode::UNAUTHORIZED,
        };

        ErrorResponse::send(self.to_string()).with_status(status_code).into_response()
    }
}
