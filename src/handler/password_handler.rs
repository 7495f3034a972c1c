use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::config::tokens::TokenKind;
use crate::dto::token_dto::MessageDto;
use crate::dto::user_dto::{EmailRequestDto, ResetPasswordDto};
use crate::error::{api_error::ApiError, request_error::ValidatedRequest, token_error::TokenError};
use crate::repository::session_repository::SessionRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::response::app_response::SuccessResponse;
use crate::service::user_service::UserService;
use crate::state::auth_state::AuthState;
use axum::extract::State;
use chrono::{Duration, Utc};
use tracing::info;

/// POST /api/auth/forgot-password
///
/// The response is identical whether or not the address is registered,
/// so the endpoint leaks nothing about which accounts exist.
pub async fn forgot_password<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    ValidatedRequest(payload): ValidatedRequest<EmailRequestDto>,
) -> Result<SuccessResponse<MessageDto>, ApiError> {
    let email = UserService::<U>::normalize_email(&payload.email);

    if let Some(user) = state.user_repo.find_by_email(&email).await {
        let reset_token = state.token_service.issue(TokenKind::ResetPassword, user.id)?;

        // Only a slow hash of the token is persisted; a leaked users
        // table does not yield usable reset links
        let token_hash = UserService::<U>::hash_password(&reset_token)?;
        let expires_at =
            Utc::now() + Duration::minutes(parameter::get_i64("RESET_PASSWORD_TOKEN_TTL_MINUTES"));

        state
            .user_repo
            .set_reset_token(user.id, &token_hash, expires_at)
            .await?;

        let reset_url = format!(
            "{}/reset-password?token={}",
            parameter::get("CLIENT_URL"),
            reset_token
        );

        if let Err(e) = state
            .mail_service
            .send_password_reset_email(&user.email, &user.name, &reset_url)
            .await
        {
            // Still answer with the generic message; surfacing the mail
            // failure would reveal that the address resolved to a user
            secure_log::secure_error!("Failed to send password reset mail", e);
        } else {
            info!("Password reset mail queued for user ID: {}", user.id);
        }
    }

    Ok(SuccessResponse::send(MessageDto::new(
        "If the email exists, a reset link has been sent",
    )))
}

/// POST /api/auth/reset-password
///
/// Every failure mode answers with the same invalid-token error; the
/// caller cannot distinguish expired, replayed and forged tokens.
pub async fn reset_password<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    ValidatedRequest(payload): ValidatedRequest<ResetPasswordDto>,
) -> Result<SuccessResponse<MessageDto>, ApiError> {
    let claims = state
        .token_service
        .verify(TokenKind::ResetPassword, &payload.token)?;

    let user = state
        .user_repo
        .find(claims.sub)
        .await?
        .ok_or(TokenError::TokenInvalid)?;

    let (Some(stored_hash), Some(expires_at)) =
        (user.reset_password_token.as_deref(), user.reset_password_expires)
    else {
        // No pending reset: either never requested or already consumed
        return Err(TokenError::TokenInvalid)?;
    };

    if expires_at < Utc::now() {
        return Err(TokenError::TokenInvalid)?;
    }

    // The signed token must also match the hash stored by the latest
    // forgot-password request; older links die when a new one is issued
    if !bcrypt::verify(&payload.token, stored_hash).unwrap_or(false) {
        return Err(TokenError::TokenInvalid)?;
    }

    let password_hash = UserService::<U>::hash_password(&payload.new_password)?;
    state.user_repo.update_password(user.id, &password_hash).await?;

    // Force re-login everywhere the account was signed in
    let removed = state.session_repo.delete_all_for_user(user.id).await?;
    info!(
        "Password reset for user ID: {}, {} sessions revoked",
        user.id, removed
    );

    Ok(SuccessResponse::send(MessageDto::new("Password reset successful")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tokens::{TokenConfig, TokenKindConfig};
    use crate::repository::memory::{InMemorySessionRepository, InMemoryUserRepository};
    use crate::service::mail_service::MailService;
    use crate::state::auth_state::AuthState;
    use axum::body::Body;
    use axum::http::{header, Request as HttpRequest, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use tower::ServiceExt;
    use uuid::Uuid;

    type TestAuthState = AuthState<InMemoryUserRepository, InMemorySessionRepository>;

    fn test_token_service() -> crate::service::token_service::TokenService {
        crate::service::token_service::TokenService::new(TokenConfig {
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
        })
    }

    fn test_state() -> TestAuthState {
        crate::config::parameter::init();
        crate::config::logging::tests::init_test_config();

        let user_repo = InMemoryUserRepository::default();
        AuthState {
            token_service: test_token_service(),
            user_service: UserService::with_repo(user_repo.clone()),
            user_repo,
            session_repo: InMemorySessionRepository::default(),
            mail_service: MailService::local_stub(),
        }
    }

    fn router(state: TestAuthState) -> Router {
        Router::<TestAuthState>::new()
            .route("/auth/forgot-password", post(forgot_password))
            .route("/auth/reset-password", post(reset_password))
            .with_state(state)
    }

    async fn seeded_user(state: &TestAuthState, email: &str) -> Uuid {
        let user_id = Uuid::now_v7();
        let password_hash = bcrypt::hash("original-pw", 4).unwrap();
        state
            .user_repo
            .insert(user_id, email, "Ada", &password_hash)
            .await
            .unwrap();
        state.user_repo.mark_verified(user_id).await.unwrap();
        user_id
    }

    /// Issues a reset token and stores its hash the way forgot-password
    /// does, without going through the mailer.
    async fn seeded_reset_token(state: &TestAuthState, user_id: Uuid) -> String {
        let token = state
            .token_service
            .issue(TokenKind::ResetPassword, user_id)
            .unwrap();
        let token_hash = bcrypt::hash(&token, 4).unwrap();
        state
            .user_repo
            .set_reset_token(user_id, &token_hash, Utc::now() + Duration::minutes(15))
            .await
            .unwrap();
        token
    }

    fn reset_request(token: &str, new_password: &str) -> HttpRequest<Body> {
        HttpRequest::post("/auth/reset-password")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "token": token, "newPassword": new_password }).to_string(),
            ))
            .unwrap()
    }

    fn forgot_request(email: &str) -> HttpRequest<Body> {
        HttpRequest::post("/auth/forgot-password")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "email": email }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reset_revokes_all_sessions_and_is_single_use() {
        let state = test_state();
        let user_id = seeded_user(&state, "ada@x.com").await;
        let token = seeded_reset_token(&state, user_id).await;

        let expires = Utc::now() + Duration::days(7);
        let session_a = state.session_repo.create(user_id, expires).await.unwrap();
        let session_b = state.session_repo.create(user_id, expires).await.unwrap();
        let app = router(state.clone());

        let response = app
            .clone()
            .oneshot(reset_request(&token, "brand-new-pass"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Every device is signed out
        assert!(state.session_repo.find(session_a.id).await.unwrap().is_none());
        assert!(state.session_repo.find(session_b.id).await.unwrap().is_none());

        // The stored hash is consumed; replaying the same token fails
        let user = state.user_repo.find(user_id).await.unwrap().unwrap();
        assert!(user.reset_password_token.is_none());
        assert!(bcrypt::verify("brand-new-pass", &user.password).unwrap());

        let replay = app
            .oneshot(reset_request(&token, "another-pass-123"))
            .await
            .unwrap();
        assert_eq!(replay.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_reset_rejects_token_past_stored_expiry() {
        let state = test_state();
        let user_id = seeded_user(&state, "ada@x.com").await;
        let token = state
            .token_service
            .issue(TokenKind::ResetPassword, user_id)
            .unwrap();
        let token_hash = bcrypt::hash(&token, 4).unwrap();
        state
            .user_repo
            .set_reset_token(user_id, &token_hash, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();
        let app = router(state);

        let response = app
            .oneshot(reset_request(&token, "brand-new-pass"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_forgot_password_is_generic_for_unknown_email() {
        let state = test_state();
        let app = router(state);

        let response = app.oneshot(forgot_request("ghost@x.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_forgot_password_stores_reset_hash_for_known_email() {
        let state = test_state();
        let user_id = seeded_user(&state, "ada@x.com").await;
        let app = router(state.clone());

        let response = app.oneshot(forgot_request("ada@x.com")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let user = state.user_repo.find(user_id).await.unwrap().unwrap();
        assert!(user.reset_password_token.is_some());
        assert!(user.reset_password_expires.is_some());
    }
}
