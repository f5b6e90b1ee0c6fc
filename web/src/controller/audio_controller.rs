use crate::controller::ApiResponse;
use crate::params::{page_number, required_project_id, ProjectPageParams};
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{audio as AudioApi, audios};
use log::*;

/// GET the Audios of a Project
#[utoipa::path(
    get,
    path = "/api/phaunos/audios",
    params(ProjectPageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Audios", body = [audios::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin of the project"),
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
    debug!("GET Audios of Project {project_id}, page {page}");

    let audios = AudioApi::find_page_by_project(app_state.db_conn_ref(), project_id, page).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), audios)))
}
