use crate::config::parameter;
use crate::error::token_error::TokenError;
use chrono::Duration;

/// The four disjoint token classes. Each kind signs with its own secret,
/// so a token of one kind can never verify under another kind's path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
    VerifyEmail,
    ResetPassword,
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
            TokenKind::VerifyEmail => "verify-email",
            TokenKind::ResetPassword => "reset-password",
        }
    }
}

/// Signing material and lifetime for one token kind.
#[derive(Clone)]
pub struct TokenKindConfig {
    pub secret: String,
    pub ttl: Duration,
}

/// Immutable signing configuration, collected once at startup and injected
/// into the token service. Handlers never read secrets from the environment.
#[derive(Clone)]
pub struct TokenConfig {
    pub access: TokenKindConfig,
    pub refresh: TokenKindConfig,
    pub verify_email: TokenKindConfig,
    pub reset_password: TokenKindConfig,
}

impl TokenConfig {
    pub fn from_parameters() -> Result<Self, TokenError> {
        Ok(Self {
            access: TokenKindConfig {
                secret: require_secret("ACCESS_TOKEN_SECRET")?,
                ttl: Duration::minutes(parameter::get_i64("ACCESS_TOKEN_TTL_MINUTES")),
            },
            refresh: TokenKindConfig {
                secret: require_secret("REFRESH_TOKEN_SECRET")?,
                ttl: Duration::days(parameter::get_i64("REFRESH_TOKEN_TTL_DAYS")),
            },
            verify_email: TokenKindConfig {
                secret: require_secret("VERIFY_EMAIL_TOKEN_SECRET")?,
                ttl: Duration::hours(parameter::get_i64("VERIFY_EMAIL_TOKEN_TTL_HOURS")),
            },
            reset_password: TokenKindConfig {
                secret: require_secret("RESET_PASSWORD_TOKEN_SECRET")?,
                ttl: Duration::minutes(parameter::get_i64("RESET_PASSWORD_TOKEN_TTL_MINUTES")),
            },
        })
    }

    pub fn kind(&self, kind: TokenKind) -> &TokenKindConfig {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
            TokenKind::VerifyEmail => &self.verify_email,
            TokenKind::ResetPassword => &self.reset_password,
        }
    }
}

fn require_secret(name: &'static str) -> Result<String, TokenError> {
    let secret = parameter::get_optional(name).ok_or(TokenError::MissingSecret(name))?;
    validate_secret(name, &secret)?;
    Ok(secret)
}

/// Secrets must carry at least 256 bits of material for HS256.
pub fn validate_secret(name: &'static str, secret: &str) -> Result<(), TokenError> {
    if secret.len() < 32 {
        return Err(TokenError::WeakSecret(name));
    }
    Ok(())
}
