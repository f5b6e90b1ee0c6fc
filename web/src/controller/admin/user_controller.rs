use crate::controller::ApiResponse;
use crate::extractors::json_body::JsonBody;
use crate::params::{page_number, user::UpdateUserParams, PageParams};
use crate::response::user::UserWithMemberships;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{user as UserApi, users, Id, IntoUpdateMap};
use log::*;

/// GET all Users
#[utoipa::path(
    get,
    path = "/admin/users",
    params(PageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Users", body = [users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a global admin"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let users = UserApi::find_page(app_state.db_conn_ref(), page_number(params.page)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}

/// GET a User with the projects they belong to
#[utoipa::path(
    get,
    path = "/admin/users/{id}",
    params(("id" = i32, Path, description = "User id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a User", body = UserWithMemberships),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET User by id: {id}");

    let user = UserApi::find_with_memberships(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        UserWithMemberships::from(user),
    )))
}

/// UPDATE a User's username, email or admin flag
#[utoipa::path(
    put,
    path = "/admin/users/{id}",
    params(("id" = i32, Path, description = "User id to update")),
    request_body = UpdateUserParams,
    responses(
        (status = 200, description = "Successfully updated a User", body = users::Model),
        (status = 404, description = "User not found"),
        (status = 409, description = "Username or email already in use"),
        (status = 422, description = "Invalid username or email"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    JsonBody(params): JsonBody<UpdateUserParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("UPDATE User {id} with: {params:?}");

    let user = UserApi::update(app_state.db_conn_ref(), id, params.into_update_map()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), user)))
}

/// DELETE a User with their annotations and memberships
#[utoipa::path(
    delete,
    path = "/admin/users/{id}",
    params(("id" = i32, Path, description = "User id to delete")),
    responses(
        (status = 204, description = "Successfully deleted a User"),
        (status = 404, description = "User not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE User {id}");

    UserApi::delete(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
