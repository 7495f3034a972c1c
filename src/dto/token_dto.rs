use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Claims carried by access, verify-email and reset-password tokens.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenClaimsDto {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Refresh tokens additionally name the session they belong to; the
/// session id is what the refresh handler cross-checks against the store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefreshTokenClaimsDto {
    pub sub: Uuid,
    pub sid: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Plain message body used by operations that return no entity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MessageDto {
    pub message: String,
}

impl MessageDto {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
