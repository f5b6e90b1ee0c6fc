use crate::controller::ApiResponse;
use crate::params::{page_number, required_project_id, ProjectPageParams};
use crate::response::tagset::TagsetWithTags;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{tagset as TagsetApi, Id};
use log::*;

/// GET the Tagsets of a Project, each with its Tags
#[utoipa::path(
    get,
    path = "/api/phaunos/tagsets",
    params(ProjectPageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Tagsets", body = [TagsetWithTags]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "Missing project_id"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<ProjectPageParams>,
) -> Result<impl IntoResponse, Error> {
    let project_id = required_project_id(params.project_id)?;
    let page = page_number(params.page);
    debug!("GET Tagsets of Project {project_id}, page {page}");

    let tagsets: Vec<TagsetWithTags> =
        TagsetApi::find_page_by_project(app_state.db_conn_ref(), project_id, page)
            .await?
            .into_iter()
            .map(TagsetWithTags::from)
            .collect();

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), tagsets)))
}

/// GET a Tagset with its Tags
#[utoipa::path(
    get,
    path = "/api/phaunos/tagsets/{id}",
    params(("id" = i32, Path, description = "Tagset id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Tagset", body = TagsetWithTags),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tagset not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Tagset by id: {id}");

    let tagset = TagsetApi::find_with_tags(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        TagsetWithTags::from(tagset),
    )))
}
