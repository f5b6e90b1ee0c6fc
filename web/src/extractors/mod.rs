pub(crate) mod authenticated_user;
pub(crate) mod json_body;
pub(crate) mod refresh_token;

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::CookieJar;

pub(crate) const ACCESS_TOKEN_COOKIE: &str = "access_token_cookie";
pub(crate) const REFRESH_TOKEN_COOKIE: &str = "refresh_token_cookie";

/// The token from an `Authorization: Bearer` header, falling back to the named cookie.
pub(crate) fn token_from(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);

    bearer.or_else(|| {
        CookieJar::from_headers(headers)
            .get(cookie_name)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}
