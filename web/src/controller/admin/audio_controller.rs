use crate::controller::ApiResponse;
use crate::{AppState, Error};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::{audio as AudioApi, Id};
use log::*;

/// DELETE an Audio with its annotations and project links
#[utoipa::path(
    delete,
    path = "/admin/audios/{id}",
    params(("id" = i32, Path, description = "Audio id to delete")),
    responses(
        (status = 204, description = "Successfully deleted an Audio"),
        (status = 404, description = "Audio not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE Audio {id}");

    AudioApi::delete(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
