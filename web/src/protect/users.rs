use crate::params::ProjectPageParams;
use crate::protect::{authorize, Predicate, UserIsAdmin, UserIsProjectAdmin};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};

/// Project admins may list the members of their project. Listing every user takes a
/// global admin.
pub(crate) async fn index(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ProjectPageParams>,
    request: Request,
    next: Next,
) -> Response {
    let checks = match params.project_id {
        Some(project_id) => vec![Predicate::new(UserIsProjectAdmin, vec![project_id])],
        None => vec![Predicate::new(UserIsAdmin, vec![])],
    };
    authorize(&app_state, user, request, next, checks).await
}
