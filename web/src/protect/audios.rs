use crate::params::{required_project_id, ProjectPageParams};
use crate::protect::{authorize, Predicate, UserIsProjectAdmin};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState, Error};
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Checks that the authenticated user administers the project named by `project_id`.
pub(crate) async fn index(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<ProjectPageParams>,
    request: Request,
    next: Next,
) -> Response {
    let project_id = match required_project_id(params.project_id) {
        Ok(project_id) => project_id,
        Err(err) => return Error::from(err).into_response(),
    };

    let checks = vec![Predicate::new(UserIsProjectAdmin, vec![project_id])];
    authorize(&app_state, user, request, next, checks).await
}
