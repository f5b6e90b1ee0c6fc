use crate::controller::ApiResponse;
use crate::extractors::json_body::JsonBody;
use crate::params::project::MembershipParams;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{membership as MembershipApi, memberships, Id};
use log::*;

/// PUT a user's role within a Project, adding them when they are not a member yet
#[utoipa::path(
    put,
    path = "/admin/projects/{id}/memberships",
    params(("id" = i32, Path, description = "Project id")),
    request_body = MembershipParams,
    responses(
        (status = 200, description = "Membership saved", body = memberships::Model),
        (status = 403, description = "Not an admin of the project"),
        (status = 404, description = "Project or user not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn upsert(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    JsonBody(params): JsonBody<MembershipParams>,
) -> Result<impl IntoResponse, Error> {
    let membership =
        MembershipApi::upsert(app_state.db_conn_ref(), id, params.user_id, params.role).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), membership)))
}

/// DELETE a user's membership of a Project
#[utoipa::path(
    delete,
    path = "/admin/projects/{id}/memberships/{user_id}",
    params(
        ("id" = i32, Path, description = "Project id"),
        ("user_id" = i32, Path, description = "Member to remove"),
    ),
    responses(
        (status = 204, description = "Membership removed"),
        (status = 403, description = "Not an admin of the project"),
        (status = 404, description = "Project not found or user not a member"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path((id, user_id)): Path<(Id, Id)>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE membership of User {user_id} in Project {id}");

    MembershipApi::delete(app_state.db_conn_ref(), id, user_id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
