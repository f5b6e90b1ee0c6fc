//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
///
/// Errors in the Domain layer are modeled as a tree with `domain::error::Error` as the root,
/// holding a tree of `error_kind` enums for the kinds of errors raised here or in lower
/// layers. `source` keeps the original error. `web` turns the kinds into HTTP status codes
/// and the human readable messages carried by some kinds into response bodies.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
    External(ExternalErrorKind),
}

/// Enum representing the various kinds of internal errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    /// A request that is well formed but breaks a business rule. One message per broken rule.
    Validation(Vec<String>),
    Config,
    Other(String),
}

/// Entity errors bubbling up from `entity_api`, reduced to what the domain cares about,
/// plus the access outcomes the domain itself decides on.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound(String),
    /// A malformed request. One message per problem found.
    Invalid(Vec<String>),
    Unauthenticated(String),
    Forbidden,
    Conflict(String),
    DbTransaction,
    Other(String),
}

/// Enum representing the various kinds of external errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum ExternalErrorKind {
    Network,
    Other(String),
}

impl Error {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::entity(EntityErrorKind::NotFound(message.into()))
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::entity(EntityErrorKind::Invalid(vec![message.into()]))
    }

    pub fn invalid_fields(messages: Vec<String>) -> Self {
        Self::entity(EntityErrorKind::Invalid(messages))
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        Self::entity(EntityErrorKind::Unauthenticated(message.into()))
    }

    pub fn forbidden() -> Self {
        Self::entity(EntityErrorKind::Forbidden)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::entity(EntityErrorKind::Conflict(message.into()))
    }

    pub fn validation(messages: Vec<String>) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Validation(messages)),
        }
    }

    pub fn config() -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Config),
        }
    }

    fn entity(kind: EntityErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        }
    }

    /// Whether this error means the record looked up does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound(_)))
        )
    }

    /// Replaces the message of a not-found error, leaving every other error untouched.
    pub fn with_not_found_message(mut self, message: impl Into<String>) -> Self {
        if self.is_not_found() {
            self.error_kind = DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::NotFound(message.into()),
            ));
        }
        self
    }

    /// Replaces the message of a conflict error, leaving every other error untouched.
    pub fn with_conflict_message(mut self, message: impl Into<String>) -> Self {
        if let DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict(_))) =
            self.error_kind
        {
            self.error_kind = DomainErrorKind::Internal(InternalErrorKind::Entity(
                EntityErrorKind::Conflict(message.into()),
            ));
        }
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound => {
                EntityErrorKind::NotFound("Record not found.".to_string())
            }
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                EntityErrorKind::Invalid(vec!["Invalid request.".to_string()])
            }
            EntityApiErrorKind::RecordUnauthenticated => {
                EntityErrorKind::Unauthenticated("Invalid credentials.".to_string())
            }
            EntityApiErrorKind::RecordAlreadyExists => {
                EntityErrorKind::Conflict("Record already exists.".to_string())
            }
            EntityApiErrorKind::SystemError | EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::DbTransaction
            }
            EntityApiErrorKind::Other => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Errors building the client happen before any network call is made.
        if err.is_builder() {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Failed to build reqwest client".to_string(),
                )),
            }
        } else {
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
            }
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                "File storage error".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_already_exists_becomes_a_conflict() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordAlreadyExists,
        }
        .into();

        assert!(matches!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Conflict(_)))
        ));
    }

    #[test]
    fn not_found_message_can_be_specialised() {
        let err: Error = EntityApiError {
            source: None,
            error_kind: EntityApiErrorKind::RecordNotFound,
        }
        .into();

        let err = err.with_not_found_message("Project with id 3 not found");

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound(
                "Project with id 3 not found".to_string()
            )))
        );
    }

    #[test]
    fn with_not_found_message_leaves_other_errors_alone() {
        let err = Error::forbidden().with_not_found_message("ignored");

        assert_eq!(
            err.error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Forbidden))
        );
    }
}
