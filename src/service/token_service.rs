use crate::config::tokens::{TokenConfig, TokenKind};
use crate::dto::token_dto::{RefreshTokenClaimsDto, TokenClaimsDto};
use crate::error::token_error::TokenError;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Issues and verifies the four token classes. Verification is purely
/// cryptographic/structural; store cross-checks (session rotation, reset
/// hash comparison) live with the handlers that own those stores.
#[derive(Clone)]
pub struct TokenService {
    config: TokenConfig,
}

impl TokenService {
    pub fn new(config: TokenConfig) -> Self {
        Self { config }
    }

    /// Issue an access, verify-email or reset-password token for a user.
    /// Refresh tokens carry a session id and go through `issue_refresh`.
    pub fn issue(&self, kind: TokenKind, user_id: Uuid) -> Result<String, TokenError> {
        debug_assert!(kind != TokenKind::Refresh);
        let (iat, exp) = self.lifetime(kind)?;
        let claims = TokenClaimsDto {
            sub: user_id,
            iat,
            exp,
        };
        self.encode(kind, &claims)
    }

    pub fn issue_refresh(&self, user_id: Uuid, session_id: Uuid) -> Result<String, TokenError> {
        let (iat, exp) = self.lifetime(TokenKind::Refresh)?;
        let claims = RefreshTokenClaimsDto {
            sub: user_id,
            sid: session_id,
            iat,
            exp,
        };
        self.encode(TokenKind::Refresh, &claims)
    }

    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaimsDto, TokenError> {
        debug_assert!(kind != TokenKind::Refresh);
        self.decode(kind, token)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshTokenClaimsDto, TokenError> {
        self.decode(TokenKind::Refresh, token)
    }

    fn lifetime(&self, kind: TokenKind) -> Result<(i64, i64), TokenError> {
        let now = chrono::Utc::now();
        let iat = now.timestamp();
        let exp = now
            .checked_add_signed(self.config.kind(kind).ttl)
            .ok_or_else(|| {
                TokenError::TokenCreation("Token expiration calculation overflow".to_string())
            })?
            .timestamp();
        Ok((iat, exp))
    }

    fn encode<C: Serialize>(&self, kind: TokenKind, claims: &C) -> Result<String, TokenError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.config.kind(kind).secret.as_ref()),
        )
        .map_err(|e| TokenError::TokenCreation(e.to_string()))
    }

    fn decode<C: DeserializeOwned>(&self, kind: TokenKind, token: &str) -> Result<C, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // seconds of clock skew

        decode::<C>(
            token,
            &DecodingKey::from_secret(self.config.kind(kind).secret.as_ref()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|_| TokenError::TokenInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tokens::TokenKindConfig;
    use chrono::Duration;

    fn test_config() -> TokenConfig {
        TokenConfig {
            access: TokenKindConfig {
                secret: "access-secret-0123456789-0123456789".to_string(),
                ttl: Duration::minutes(15),
            },
            refresh: TokenKindConfig {
                secret: "refresh-secret-0123456789-0123456789".to_string(),
                ttl: Duration::days(7),
            },
            verify_email: TokenKindConfig {
                secret: "verify-secret-0123456789-0123456789".to_string(),
                ttl: Duration::hours(24),
            },
            reset_password: TokenKindConfig {
                secret: "reset-secret-0123456789-0123456789".to_string(),
                ttl: Duration::minutes(15),
            },
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let service = TokenService::new(test_config());
        let user_id = Uuid::now_v7();

        let token = service.issue(TokenKind::Access, user_id).unwrap();
        let claims = service.verify(TokenKind::Access, &token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_refresh_token_carries_session_id() {
        let service = TokenService::new(test_config());
        let user_id = Uuid::now_v7();
        let session_id = Uuid::now_v7();

        let token = service.issue_refresh(user_id, session_id).unwrap();
        let claims = service.verify_refresh(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.sid, session_id);
    }

    #[test]
    fn test_token_kinds_do_not_cross_validate() {
        let service = TokenService::new(test_config());
        let user_id = Uuid::now_v7();

        let access = service.issue(TokenKind::Access, user_id).unwrap();
        let verify_email = service.issue(TokenKind::VerifyEmail, user_id).unwrap();
        let reset = service.issue(TokenKind::ResetPassword, user_id).unwrap();

        // Each kind signs with its own secret; any cross-path check fails
        assert!(service.verify(TokenKind::VerifyEmail, &access).is_err());
        assert!(service.verify(TokenKind::Access, &verify_email).is_err());
        assert!(service.verify(TokenKind::VerifyEmail, &reset).is_err());
        assert!(service.verify_refresh(&access).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut config = test_config();
        // Past the decoder's 30s leeway
        config.access.ttl = Duration::minutes(-5);
        let service = TokenService::new(config);

        let token = service.issue(TokenKind::Access, Uuid::now_v7()).unwrap();
        assert!(matches!(
            service.verify(TokenKind::Access, &token),
            Err(TokenError::TokenInvalid)
        ));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = TokenService::new(test_config());
        let token = service.issue(TokenKind::Access, Uuid::now_v7()).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push('x');

        assert!(service.verify(TokenKind::Access, &tampered).is_err());
        assert!(service.verify(TokenKind::Access, "not-a-jwt").is_err());
    }
}
