use crate::controller::ApiResponse;
use crate::params::{page_number, PageParams};
use crate::response::project::ProjectDetail;
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{project as ProjectApi, projects, Id};
use log::*;

/// GET all Projects, ordered by name
#[utoipa::path(
    get,
    path = "/api/phaunos/projects",
    params(PageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Projects", body = [projects::Model]),
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let page = page_number(params.page);
    debug!("GET Projects page {page}");

    let projects = ProjectApi::find_page(app_state.db_conn_ref(), page).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), projects)))
}

/// GET a Project with its annotation progress
#[utoipa::path(
    get,
    path = "/api/phaunos/projects/{id}",
    params(("id" = i32, Path, description = "Project id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Project", body = ProjectDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin of the project"),
        (status = 404, description = "Project not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    debug!("GET Project by id: {id}");

    let detail = ProjectApi::find_detail(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ProjectDetail::from(detail),
    )))
}
