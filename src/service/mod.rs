pub mod mail_service;
pub mod token_service;
pub mod user_service;
