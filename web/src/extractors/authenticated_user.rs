use crate::extractors::{token_from, ACCESS_TOKEN_COOKIE};
use crate::{AppState, Error};
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use domain::{error::Error as DomainError, user as UserApi, users};
use log::*;

/// The user owning the access token of the request.
///
/// The resolved user is kept in the request extensions, so the `protect` middleware and the
/// handler behind it share one lookup.
pub(crate) struct AuthenticatedUser(pub users::Model);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<users::Model>() {
            return Ok(AuthenticatedUser(user.clone()));
        }

        let token = token_from(&parts.headers, ACCESS_TOKEN_COOKIE).ok_or_else(|| {
            debug!("Request to {} carries no access token", parts.uri.path());
            DomainError::unauthenticated("Missing access token.")
        })?;

        let app_state = AppState::from_ref(state);
        let user = UserApi::authenticate(app_state.db_conn_ref(), &app_state.config, &token).await?;
        trace!("Authenticated {} for {}", user.username, parts.uri.path());

        parts.extensions.insert(user.clone());
        Ok(AuthenticatedUser(user))
    }
}
