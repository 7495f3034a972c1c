pub mod auth_handler;
pub mod health_handler;
pub mod password_handler;
pub mod session_handler;
pub mod user_handler;
