use crate::config::parameter;
use crate::config::tokens::TokenKind;
use crate::dto::token_dto::MessageDto;
use crate::error::{api_error::ApiError, session_error::SessionError, token_error::TokenError};
use crate::middleware::cookies;
use crate::repository::session_repository::SessionRepositoryTrait;
use crate::repository::user_repository::UserRepositoryTrait;
use crate::response::app_response::SuccessResponse;
use crate::state::auth_state::AuthState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use chrono::{Duration, Utc};
use tracing::{info, warn};

/// POST /api/auth/refresh-tokens
///
/// Rotates the refresh token bound to the presented session. The stored
/// token must match the presented one verbatim; a mismatch means the
/// token was already rotated out (stolen-token replay or a lost race)
/// and the request is rejected without touching the session.
pub async fn refresh_tokens<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, ApiError> {
    let presented = jar
        .get(cookies::REFRESH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(TokenError::MissingRefreshToken)?;

    let claims = state.token_service.verify_refresh(&presented)?;

    let session = state
        .session_repo
        .find(claims.sid)
        .await?
        .ok_or(SessionError::InvalidSession)?;

    if session.refresh_token != presented {
        warn!("Refresh rejected: presented token no longer current for session {}", session.id);
        return Err(SessionError::InvalidSession)?;
    }

    if session.expires_at < Utc::now() {
        return Err(SessionError::SessionExpired)?;
    }

    let refresh_ttl_days = parameter::get_i64("REFRESH_TOKEN_TTL_DAYS");
    let new_expiry = Utc::now() + Duration::days(refresh_ttl_days);

    let access_token = state.token_service.issue(TokenKind::Access, session.user_id)?;
    let refresh_token = state
        .token_service
        .issue_refresh(session.user_id, session.id)?;

    // Conditional swap; a concurrent refresh that committed first makes
    // this one lose and the loser gets no cookies
    let rotated = state
        .session_repo
        .rotate_refresh_token(session.id, &presented, &refresh_token, new_expiry)
        .await?;

    if !rotated {
        warn!("Refresh lost rotation race on session {}", session.id);
        return Err(SessionError::InvalidSession)?;
    }

    let secure = parameter::is_production();
    let jar = jar
        .add(cookies::access_cookie(
            access_token,
            parameter::get_i64("ACCESS_TOKEN_TTL_MINUTES"),
            secure,
        ))
        .add(cookies::refresh_cookie(refresh_token, refresh_ttl_days, secure));

    info!("Tokens rotated for session ID: {}", session.id);
    Ok((
        jar,
        SuccessResponse::send(MessageDto::new("Tokens refreshed successfully"))
            .with_status(StatusCode::CREATED),
    ))
}

/// POST /api/auth/logout
///
/// Graceful teardown: the cookies are cleared no matter what, and the
/// session row is deleted when the presented refresh token still names
/// a live session. An invalid or missing token is not an error here.
pub async fn logout<U: UserRepositoryTrait, S: SessionRepositoryTrait>(
    State(state): State<AuthState<U, S>>,
    jar: CookieJar,
) -> impl IntoResponse {
    if let Some(presented) = jar.get(cookies::REFRESH_COOKIE).map(|c| c.value().to_string()) {
        if let Ok(claims) = state.token_service.verify_refresh(&presented) {
            match state.session_repo.delete(claims.sid).await {
                Ok(()) => info!("Session {} deleted on logout", claims.sid),
                Err(e) => {
                    // Cookies are still cleared; the sweeper reclaims
                    // the row once it expires
                    warn!("Failed to delete session on logout: {}", e);
                }
            }
        }
    }

    let (access, refresh) = cookies::clear_auth_cookies();
    (
        jar.add(access).add(refresh),
        SuccessResponse::send(MessageDto::new("Logout successful")).with_status(StatusCode::CREATED),
    )
}
