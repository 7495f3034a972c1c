use crate::handler::auth_handler;
use crate::handler::password_handler;
use crate::handler::session_handler;
use crate::state::auth_state::AuthState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn routes() -> Router<AuthState> {
    Router::<AuthState>::new()
        .route("/auth/register", post(auth_handler::register))
        .route("/auth/verify-email", get(auth_handler::verify_email))
        .route("/auth/req-verify-email", post(auth_handler::resend_verification))
        .route("/auth/login", post(auth_handler::login))
        .route("/auth/refresh-tokens", post(session_handler::refresh_tokens))
        .route("/auth/logout", post(session_handler::logout))
        .route("/auth/forgot-password", post(password_handler::forgot_password))
        .route("/auth/reset-password", post(password_handler::reset_password))
}
