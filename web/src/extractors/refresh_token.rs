use crate::extractors::{token_from, REFRESH_TOKEN_COOKIE};
use crate::Error;
use axum::{extract::FromRequestParts, http::request::Parts};
use domain::error::Error as DomainError;

/// The raw refresh token of the request, validated later by the token controller.
pub(crate) struct RefreshToken(pub String);

impl<S> FromRequestParts<S> for RefreshToken
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        token_from(&parts.headers, REFRESH_TOKEN_COOKIE)
            .map(RefreshToken)
            .ok_or_else(|| DomainError::unauthenticated("Missing refresh token.").into())
    }
}
