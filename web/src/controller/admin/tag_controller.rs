use crate::controller::ApiResponse;
use crate::extractors::json_body::JsonBody;
use crate::params::{page_number, tag::TagParams, PageParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{tag as TagApi, tags, Id};
use log::*;

#[utoipa::path(
    get,
    path = "/admin/tags",
    params(PageParams),
    responses((status = 200, description = "Successfully retrieved a page of Tags", body = [tags::Model])),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let tags = TagApi::find_page(app_state.db_conn_ref(), page_number(params.page)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tags)))
}

#[utoipa::path(
    get,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Tag", body = tags::Model),
        (status = 404, description = "Tag not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let tag = TagApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tag)))
}

#[utoipa::path(
    post,
    path = "/admin/tags",
    request_body = TagParams,
    responses(
        (status = 201, description = "Successfully created a Tag", body = tags::Model),
        (status = 409, description = "A tag with this name exists"),
        (status = 422, description = "Missing name"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<TagParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("CREATE new Tag {}", params.name);

    let tag = TagApi::create(app_state.db_conn_ref(), params.name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), tag)),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag id to rename")),
    request_body = TagParams,
    responses(
        (status = 200, description = "Successfully renamed a Tag", body = tags::Model),
        (status = 404, description = "Tag not found"),
        (status = 409, description = "A tag with this name exists"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    JsonBody(params): JsonBody<TagParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("UPDATE Tag {id} to {}", params.name);

    let tag = TagApi::update(app_state.db_conn_ref(), id, params.name).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tag)))
}

/// DELETE a Tag with its annotations and tagset links
#[utoipa::path(
    delete,
    path = "/admin/tags/{id}",
    params(("id" = i32, Path, description = "Tag id to delete")),
    responses(
        (status = 204, description = "Successfully deleted a Tag"),
        (status = 404, description = "Tag not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE Tag {id}");

    TagApi::delete(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
