use crate::controller::ApiResponse;
use crate::params::{page_number, ProjectPageParams};
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{user as UserApi, users};
use log::*;

/// GET the members of a Project, or every User when no project is given
#[utoipa::path(
    get,
    path = "/api/phaunos/users",
    params(ProjectPageParams),
    responses(
        (status = 200, description = "Successfully retrieved a page of Users", body = [users::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not an admin of the project"),
        (status = 404, description = "Project not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<ProjectPageParams>,
) -> Result<impl IntoResponse, Error> {
    let page = page_number(params.page);
    debug!("GET Users of {:?}, page {page}", params.project_id);

    let users = match params.project_id {
        Some(project_id) => {
            UserApi::find_page_by_project(app_state.db_conn_ref(), project_id, page).await?
        }
        None => UserApi::find_page(app_state.db_conn_ref(), page).await?,
    };

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), users)))
}
