use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub const ACCESS_COOKIE: &str = "accessToken";
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Session cookies are HttpOnly + SameSite=Strict; Secure is driven by
/// the deployment environment. Max-age always matches the token TTL.
fn session_cookie(name: &'static str, value: String, max_age: Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .path("/")
        .max_age(max_age)
        .build()
}

pub fn access_cookie(token: String, ttl_minutes: i64, secure: bool) -> Cookie<'static> {
    session_cookie(ACCESS_COOKIE, token, Duration::minutes(ttl_minutes), secure)
}

pub fn refresh_cookie(token: String, ttl_days: i64, secure: bool) -> Cookie<'static> {
    session_cookie(REFRESH_COOKIE, token, Duration::days(ttl_days), secure)
}

/// Removal cookies sent by logout; a failed refresh leaves the cookies
/// untouched so the client can retry or log out explicitly.
pub fn clear_auth_cookies() -> (Cookie<'static>, Cookie<'static>) {
    let access = Cookie::build((ACCESS_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    let refresh = Cookie::build((REFRESH_COOKIE, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build();

    (access, refresh)
}
