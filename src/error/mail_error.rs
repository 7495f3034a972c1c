use crate::response::app_response::ErrorResponse;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MailError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
    #[error("SMTP_PORT {0} is out of range (1-65535)")]
    InvalidPort(u64),
    /// The transport did not answer within the configured bound; the
    /// request must never hang on the mailer.
    #[error("Mail send timed out")]
    Timeout,
}

impl IntoResponse for MailError {
    fn into_response(self) -> Response {
        // SMTP detail stays in the logs
        ErrorResponse::send("Failed to send email".to_string())
            .with_status(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()
    }
}
