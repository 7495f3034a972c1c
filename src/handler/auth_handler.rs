use crate::config::logging::secure_log;
use crate::config::parameter;
use crate::config::tokens::TokenKind;
use crate::dto::token_dto::MessageDto;
use crate::dto::user_dto::{EmailRequestDto, LoginUserDto, RegisterUserDto, UserReadDto, VerifyEmailQueryDto};
use crate::error::{api_error::ApiError, request_error::ValidatedRequest, user_error::UserError};
use crate::middleware::cookies;
use crate::repository::session_repository::SessionRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::response::app_response::SuccessResponse;
use crate::service::user_service::UserService;
use crate::state::auth_state::AuthState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use tracing::{info, warn};

/// POST /api/auth/register
pub async fn register<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    ValidatedRequest(payload): ValidatedRequest<RegisterUserDto>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Registration attempt");

    let user = state.user_service.create_user(payload).await?;

    let verify_token = state.token_service.issue(TokenKind::VerifyEmail, user.id)?;
    let verify_url = format!(
        "{}/api/auth/verify-email?token={}",
        parameter::get("APP_URL"),
        verify_token
    );

    // The user row is already committed; mail delivery is best-effort and
    // a failure here must not undo the registration. The account can be
    // re-verified through req-verify-email.
    if let Err(e) = state
        .mail_service
        .send_verification_email(&user.email, &user.name, &verify_url)
        .await
    {
        secure_log::secure_error!("Verification mail failed after registration", e);
    }

    info!("User registered with ID: {}", user.id);
    Ok(SuccessResponse::send(UserReadDto::from(user)).with_status(StatusCode::CREATED))
}

/// GET /api/auth/verify-email?token=
pub async fn verify_email<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    Query(query): Query<VerifyEmailQueryDto>,
) -> Result<SuccessResponse<MessageDto>, ApiError> {
    let claims = state.token_service.verify(TokenKind::VerifyEmail, &query.token)?;

    let user = state
        .user_repo
        .find(claims.sub)
        .await?
        .ok_or(UserError::UserNotFound)?;

    // Idempotence guard; the unverified -> verified transition is one-way
    if user.is_verified {
        return Err(UserError::AlreadyVerified)?;
    }

    state.user_repo.mark_verified(user.id).await?;

    info!("Email verified for user ID: {}", user.id);
    Ok(SuccessResponse::send(MessageDto::new("Email verified successfully")))
}

/// POST /api/auth/req-verify-email
///
/// Always answers with the same generic message so the endpoint cannot be
/// used to probe which addresses exist.
pub async fn resend_verification<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    ValidatedRequest(payload): ValidatedRequest<EmailRequestDto>,
) -> Result<SuccessResponse<MessageDto>, ApiError> {
    let email = UserService::<U>::normalize_email(&payload.email);

    if let Some(user) = state.user_repo.find_by_email(&email).await {
        if !user.is_verified {
            let verify_token = state.token_service.issue(TokenKind::VerifyEmail, user.id)?;
            let verify_url = format!(
                "{}/api/auth/verify-email?token={}",
                parameter::get("APP_URL"),
                verify_token
            );
            if let Err(e) = state
                .mail_service
                .send_verification_email(&user.email, &user.name, &verify_url)
                .await
            {
                secure_log::secure_error!("Failed to re-send verification mail", e);
            }
        }
    }

    Ok(SuccessResponse::send(MessageDto::new(
        "If the email exists and is unverified, a verification link has been sent",
    )))
}

/// POST /api/auth/login
pub async fn login<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    jar: CookieJar,
    ValidatedRequest(payload): ValidatedRequest<LoginUserDto>,
) -> Result<impl IntoResponse, ApiError> {
    let email = UserService::<U>::normalize_email(&payload.email);
    secure_log::sensitive_debug!("Login attempt for email: {}", email);

    // Generic failure for both unknown email and wrong password
    let user = state
        .user_repo
        .find_by_email(&email)
        .await
        .ok_or_else(|| {
            warn!("Login failed: unknown email");
            UserError::InvalidCredentials
        })?;

    // Verification gates login regardless of password correctness
    if !user.is_verified {
        return Err(UserError::EmailNotVerified)?;
    }

    if !state.user_service.verify_password(&user, &payload.password) {
        return Err(UserError::InvalidCredentials)?;
    }

    let refresh_ttl_days = parameter::get_i64("REFRESH_TOKEN_TTL_DAYS");
    let expires_at = Utc::now() + Duration::days(refresh_ttl_days);

    // The session id has to exist before the refresh token can name it;
    // the row starts with a placeholder and gets the real token below.
    let session = state.session_repo.create(user.id, expires_at).await?;

    let access_token = state.token_service.issue(TokenKind::Access, user.id)?;
    let refresh_token = state.token_service.issue_refresh(user.id, session.id)?;

    state
        .session_repo
        .set_refresh_token(session.id, &refresh_token)
        .await?;

    let secure = parameter::is_production();
    let jar = jar
        .add(cookies::access_cookie(
            access_token,
            parameter::get_i64("ACCESS_TOKEN_TTL_MINUTES"),
            secure,
        ))
        .add(cookies::refresh_cookie(refresh_token, refresh_ttl_days, secure));

    info!("Login successful for user ID: {}, session ID: {}", user.id, session.id);
    Ok((jar, SuccessResponse::send(UserReadDto::from(user))))
}
