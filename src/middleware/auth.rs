use crate::config::logging::secure_log;
use crate::config::tokens::TokenKind;
use crate::error::api_error::ApiError;
use crate::error::token_error::TokenError;
use crate::middleware::cookies::ACCESS_COOKIE;
use crate::state::token_state::TokenState;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

/// Identity claim attached to the request once the access cookie checks
/// out. Downstream handlers read it from request extensions; there is no
/// global current-user state.
#[derive(Clone, Copy, Debug)]
pub struct CurrentUser {
    pub user_id: Uuid,
}

fn verify_access_cookie(state: &TokenState, jar: &CookieJar) -> Result<CurrentUser, TokenError> {
    let token = jar
        .get(ACCESS_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(TokenError::Unauthenticated)?;

    // Signature and expiry only; access tokens are never cross-checked
    // against the session store, which is why their TTL stays short.
    let claims = state
        .token_service
        .verify(TokenKind::Access, &token)
        .map_err(|_| TokenError::Unauthenticated)?;

    Ok(CurrentUser {
        user_id: claims.sub,
    })
}

/// Strict gate: 401 when the access cookie is missing or invalid.
pub async fn require_auth(
    State(state): State<TokenState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    match verify_access_cookie(&state, &jar) {
        Ok(current_user) => {
            req.extensions_mut().insert(current_user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            secure_log::secure_error!("Rejected unauthenticated request", e);
            Err(e)?
        }
    }
}

/// Optional gate: attaches the identity claim when present and valid,
/// otherwise lets the request through anonymously.
pub async fn optional_auth(
    State(state): State<TokenState>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());

    if let Ok(current_user) = verify_access_cookie(&state, &jar) {
        req.extensions_mut().insert(current_user);
    }

    next.run(req).await
}
