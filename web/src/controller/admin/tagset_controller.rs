use crate::controller::ApiResponse;
use crate::extractors::json_body::JsonBody;
use crate::params::tagset::{CreateParams, UpdateParams};
use crate::params::{page_number, PageParams};
use crate::response::tagset::TagsetWithTags;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{tagset as TagsetApi, Id};
use log::*;

#[utoipa::path(
    get,
    path = "/admin/tagsets",
    params(PageParams),
    responses((status = 200, description = "Successfully retrieved a page of Tagsets", body = [TagsetWithTags])),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let tagsets: Vec<TagsetWithTags> =
        TagsetApi::find_page(app_state.db_conn_ref(), page_number(params.page))
            .await?
            .into_iter()
            .map(TagsetWithTags::from)
            .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tagsets)))
}

#[utoipa::path(
    get,
    path = "/admin/tagsets/{id}",
    params(("id" = i32, Path, description = "Tagset id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Tagset", body = TagsetWithTags),
        (status = 404, description = "Tagset not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let tagset = TagsetApi::find_with_tags(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TagsetWithTags::from(tagset),
    )))
}

#[utoipa::path(
    post,
    path = "/admin/tagsets",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created a Tagset", body = TagsetWithTags),
        (status = 404, description = "Unknown tag id"),
        (status = 409, description = "A tagset with this name exists"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("CREATE new Tagset from: {params:?}");

    let tagset = TagsetApi::create(app_state.db_conn_ref(), params.name, params.tag_ids).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.into(),
            TagsetWithTags::from(tagset),
        )),
    ))
}

#[utoipa::path(
    put,
    path = "/admin/tagsets/{id}",
    params(("id" = i32, Path, description = "Tagset id to update")),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated a Tagset", body = TagsetWithTags),
        (status = 404, description = "Tagset or tag not found"),
        (status = 409, description = "A tagset with this name exists"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    JsonBody(params): JsonBody<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("UPDATE Tagset {id} with: {params:?}");

    let tagset =
        TagsetApi::update(app_state.db_conn_ref(), id, params.name, params.tag_ids).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TagsetWithTags::from(tagset),
    )))
}

/// DELETE a Tagset with its tag and project links
#[utoipa::path(
    delete,
    path = "/admin/tagsets/{id}",
    params(("id" = i32, Path, description = "Tagset id to delete")),
    responses(
        (status = 204, description = "Successfully deleted a Tagset"),
        (status = 404, description = "Tagset not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE Tagset {id}");

    TagsetApi::delete(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
