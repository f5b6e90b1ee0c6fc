use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, json_body::JsonBody};
use crate::params::annotation::{CreateParams, IndexParams};
use crate::params::page_number;
use crate::{AppState, Error};
use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use domain::annotation::{self as AnnotationApi, AnnotationList};
use domain::membership::ProjectAccess;
use domain::{annotations, IntoQueryFilterMap};
use log::*;

const EXPORT_DISPOSITION: &str = "attachment;filename=annotations.json";

/// GET the Annotations of a Project
///
/// Members get their own annotations one page at a time. Admins of the project get everyone's,
/// and with `web=1` receive the whole matching set as a downloadable file.
#[utoipa::path(
    get,
    path = "/api/phaunos/annotations",
    params(IndexParams),
    responses(
        (status = 200, description = "A page of Annotations, or an attachment holding all of them", body = [annotations::Model]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of the project"),
        (status = 404, description = "Project, audio or tag not found"),
        (status = 422, description = "Missing project_id"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Extension(access): Extension<ProjectAccess>,
    Query(params): Query<IndexParams>,
) -> Result<Response, Error> {
    let export = params.web;
    let page = page_number(params.page);
    debug!("GET Annotations by {} with {params:?}", user.username);

    let annotations = AnnotationApi::find_by(
        app_state.db_conn_ref(),
        &user,
        access,
        params.into_query_filter_map(),
        export,
        page,
    )
    .await?;

    Ok(match annotations {
        AnnotationList::Export(annotations) => (
            [(header::CONTENT_DISPOSITION, EXPORT_DISPOSITION)],
            Json(annotations),
        )
            .into_response(),
        AnnotationList::Page(annotations) => {
            Json(ApiResponse::new(StatusCode::OK.into(), annotations)).into_response()
        }
    })
}

/// CREATE an Annotation authored by the caller
#[utoipa::path(
    post,
    path = "/api/phaunos/annotations",
    request_body = CreateParams,
    responses(
        (status = 201, description = "Successfully created an Annotation", body = annotations::Model),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of the project"),
        (status = 404, description = "Project not found"),
        (status = 422, description = "The annotation does not fit the project"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    JsonBody(params): JsonBody<CreateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("CREATE new Annotation by {} from: {params:?}", user.username);

    let annotation =
        AnnotationApi::create(app_state.db_conn_ref(), &user, params.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), annotation)),
    ))
}
