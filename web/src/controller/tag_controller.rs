use crate::controller::ApiResponse;
use crate::params::{page_number, PageParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{tag as TagApi, tags, Id};
use log::*;

/// GET all Tags
#[utoipa::path(
    get,
    path = "/api/phaunos/tags",
    params(PageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Tags", body = [tags::Model]),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let page = page_number(params.page);
    debug!("GET Tags page {page}");

    let tags = TagApi::find_page(app_state.db_conn_ref(), page).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tags)))
}

/// GET a Tag
#[utoipa::path(
    get,
    path = "/api/phaunos/tags/{id}",
    params(("id" = i32, Path, description = "Tag id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Tag", body = tags::Model),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tag not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Tag by id: {id}");

    let tag = TagApi::find_by_id(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tag)))
}
