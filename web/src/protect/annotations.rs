use crate::params::{annotation::IndexParams, required_project_id};
use crate::{extractors::authenticated_user::AuthenticatedUser, AppState, Error};
use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::membership;
use log::*;

/// Lets any member of the project through and records how they relate to it.
///
/// The resolved [`membership::ProjectAccess`] is placed in the request extensions, where the
/// handler reads it to decide between an export, all annotations or only the caller's own.
pub(crate) async fn index(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(params): Query<IndexParams>,
    mut request: Request,
    next: Next,
) -> Response {
    let access = match required_project_id(params.project_id) {
        Ok(project_id) => {
            membership::project_access(app_state.db_conn_ref(), &user, project_id)
                .await
                .and_then(|access| membership::require_member(access).map(|_| access))
        }
        Err(err) => Err(err),
    };

    match access {
        Ok(access) => {
            request.extensions_mut().insert(access);
            next.run(request).await
        }
        Err(err) => {
            warn!("User {} may not list annotations: {err}", user.username);
            Error::from(err).into_response()
        }
    }
}
