use crate::protect::{authorize, Predicate, UserIsProjectAdmin};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState};
use axum::{
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use domain::Id;

/// Project details are for the admins of the project.
pub(crate) async fn read(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Id>,
    request: Request,
    next: Next,
) -> Response {
    let checks = vec![Predicate::new(UserIsProjectAdmin, vec![id])];
    authorize(&app_state, user, request, next, checks).await
}
