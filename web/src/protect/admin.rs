use crate::protect::{authorize, Predicate, UserIsAdmin, UserIsProjectAdmin};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use domain::Id;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectPath {
    id: Id,
}

/// Guards the administration API.
pub(crate) async fn global_admin(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> Response {
    let checks = vec![Predicate::new(UserIsAdmin, vec![])];
    authorize(&app_state, user, request, next, checks).await
}

/// Memberships of a project may also be edited by the admins of that project.
pub(crate) async fn memberships(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(ProjectPath { id }): Path<ProjectPath>,
    request: Request,
    next: Next,
) -> Response {
    let checks = vec![Predicate::new(UserIsProjectAdmin, vec![id])];
    authorize(&app_state, user, request, next, checks).await
}
