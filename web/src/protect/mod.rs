//! This module provides protection mechanisms for the routes of the web application.
//!
//! Each submodule holds the middleware for one group of routes. A middleware resolves the
//! project the request targets, then evaluates one or more [`Predicate`]s against the
//! authenticated user before the handler runs.

pub(crate) mod admin;
pub(crate) mod annotations;
pub(crate) mod audios;
pub(crate) mod projects;
pub(crate) mod users;

use crate::{AppState, Error};
use async_trait::async_trait;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::{error::Error as DomainError, membership, users as user_model, Id};
use log::*;

/// Trait representing a single authorization rule.
///
/// Implementors answer **"is the authenticated user allowed to proceed?"**. A rule that
/// refers to a missing resource fails with a not found error rather than a refusal, so
/// callers can tell the two apart.
#[async_trait]
pub trait Check: Send + Sync {
    async fn eval(
        &self,
        app: &AppState,
        user: &user_model::Model,
        args: Vec<Id>,
    ) -> Result<(), DomainError>;
}

/// Pairs a [`Check`] implementation with the concrete arguments that the rule
/// should receive when evaluated.
pub(crate) struct Predicate {
    predicate: Box<dyn Check>,
    args: Vec<Id>,
}

impl Predicate {
    pub(crate) fn new<C: Check + 'static>(predicate: C, args: Vec<Id>) -> Self {
        Self {
            predicate: Box::new(predicate),
            args,
        }
    }

    pub(crate) async fn check(
        &self,
        app_state: &AppState,
        user: &user_model::Model,
    ) -> Result<(), DomainError> {
        self.predicate
            .eval(app_state, user, self.args.clone())
            .await
    }
}

/// Axum middleware body that enforces one or more [`Predicate`]s.
///
/// Predicates are evaluated in order and the first failing one answers the request.
pub(crate) async fn authorize(
    app_state: &AppState,
    authenticated_user: user_model::Model,
    request: Request,
    next: Next,
    checks: Vec<Predicate>,
) -> Response {
    for check in checks {
        if let Err(err) = check.check(app_state, &authenticated_user).await {
            warn!(
                "User {} refused {} {}: {err}",
                authenticated_user.username,
                request.method(),
                request.uri().path()
            );
            return Error::from(err).into_response();
        }
    }
    next.run(request).await
}

pub struct UserIsAdmin;

#[async_trait]
impl Check for UserIsAdmin {
    async fn eval(
        &self,
        _app_state: &AppState,
        authenticated_user: &user_model::Model,
        _args: Vec<Id>,
    ) -> Result<(), DomainError> {
        if authenticated_user.is_admin {
            Ok(())
        } else {
            Err(DomainError::forbidden())
        }
    }
}

/// Holds for global admins and for admins of the project given as the only argument.
pub struct UserIsProjectAdmin;

#[async_trait]
impl Check for UserIsProjectAdmin {
    async fn eval(
        &self,
        app_state: &AppState,
        authenticated_user: &user_model::Model,
        args: Vec<Id>,
    ) -> Result<(), DomainError> {
        let [project_id] = args[..] else {
            error!("UserIsProjectAdmin expects exactly one project id, got {args:?}");
            return Err(DomainError::forbidden());
        };
        let access =
            membership::project_access(app_state.db_conn_ref(), authenticated_user, project_id)
                .await?;
        membership::require_admin(access)
    }
}
