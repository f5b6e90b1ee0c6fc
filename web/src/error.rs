use std::error::Error as StdError;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use domain::error::{
    DomainErrorKind, EntityErrorKind, Error as DomainError, ExternalErrorKind, InternalErrorKind,
};

use log::*;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug)]
pub struct Error(DomainError);

impl StdError for Error {}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> core::result::Result<(), std::fmt::Error> {
        write!(fmt, "{self:?}")
    }
}

impl Error {
    pub(crate) fn status_and_messages(&self) -> (StatusCode, Vec<String>) {
        match &self.0.error_kind {
            DomainErrorKind::Internal(internal_error_kind) => match internal_error_kind {
                InternalErrorKind::Entity(entity_error_kind) => match entity_error_kind {
                    EntityErrorKind::NotFound(message) => {
                        (StatusCode::NOT_FOUND, vec![message.clone()])
                    }
                    EntityErrorKind::Invalid(messages) => {
                        (StatusCode::BAD_REQUEST, messages.clone())
                    }
                    EntityErrorKind::Unauthenticated(message) => {
                        (StatusCode::UNAUTHORIZED, vec![message.clone()])
                    }
                    EntityErrorKind::Forbidden => {
                        (StatusCode::FORBIDDEN, vec!["Not allowed.".to_string()])
                    }
                    EntityErrorKind::Conflict(message) => {
                        (StatusCode::CONFLICT, vec![message.clone()])
                    }
                    EntityErrorKind::DbTransaction | EntityErrorKind::Other(_) => internal(),
                },
                InternalErrorKind::Validation(messages) => {
                    (StatusCode::UNPROCESSABLE_ENTITY, messages.clone())
                }
                InternalErrorKind::Config | InternalErrorKind::Other(_) => internal(),
            },
            DomainErrorKind::External(external_error_kind) => match external_error_kind {
                ExternalErrorKind::Network | ExternalErrorKind::Other(_) => (
                    StatusCode::BAD_GATEWAY,
                    vec!["An external service did not respond as expected.".to_string()],
                ),
            },
        }
    }
}

fn internal() -> (StatusCode, Vec<String>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        vec!["Internal server error.".to_string()],
    )
}

// List of possible StatusCode variants https://docs.rs/http/latest/http/status/struct.StatusCode.html#associatedconstant.UNPROCESSABLE_ENTITY
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, messages) = self.status_and_messages();

        if status.is_server_error() {
            error!("Request failed with {status}: {:?}", self.0);
        } else {
            debug!("Request refused with {status}: {messages:?}");
        }

        (status, Json(json!({ "messages": messages }))).into_response()
    }
}

impl<E> From<E> for Error
where
    E: Into<DomainError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
