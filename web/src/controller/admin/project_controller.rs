use crate::controller::ApiResponse;
use crate::extractors::{authenticated_user::AuthenticatedUser, json_body::JsonBody};
use crate::params::project::{NewProjectForm, ProjectForm, UpdateParams};
use crate::params::{page_number, PageParams};
use crate::response::project::ProjectEdit;
use crate::{AppState, Error};
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::error::Error as DomainError;
use domain::{project as ProjectApi, projects, Id, IntoUpdateMap};
use log::*;

#[utoipa::path(
    get,
    path = "/admin/projects",
    params(PageParams),
    responses((status = 200, description = "Successfully retrieved a page of Projects", body = [projects::Model])),
    security(("bearer_auth" = []))
)]
pub async fn index(
    State(app_state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<impl IntoResponse, Error> {
    let projects = ProjectApi::find_page(app_state.db_conn_ref(), page_number(params.page)).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), projects)))
}

/// CREATE a Project from its audio and tag lists
///
/// Expects `multipart/form-data` with the text fields `name`, `visualization_type`,
/// `allow_regions`, `n_annotations_per_file`, `admin_user_id` and the files `audiolist`
/// and `taglist`. The project admin defaults to the caller.
#[utoipa::path(
    post,
    path = "/admin/projects",
    request_body(content = NewProjectForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Successfully created a Project", body = projects::Model),
        (status = 400, description = "Malformed multipart body"),
        (status = 404, description = "Admin user not found"),
        (status = 409, description = "A project with this name exists"),
        (status = 422, description = "Invalid field or list file"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let mut form = ProjectForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_owned();
        let known = if field.file_name().is_some() {
            let content = field.bytes().await.map_err(multipart_error)?;
            form.set_file(&name, content.to_vec())
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            form.set_text(&name, value)
        };
        if !known {
            debug!("Ignoring unknown project form field {name:?}");
        }
    }

    let project = ProjectApi::create(
        app_state.db_conn_ref(),
        &app_state.config,
        &user,
        form.into_new_project()?,
    )
    .await?;
    info!("User {} created Project {}", user.username, project.name);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(StatusCode::CREATED.into(), project)),
    ))
}

fn multipart_error(rejection: axum::extract::multipart::MultipartError) -> DomainError {
    DomainError::invalid(rejection.body_text())
}

/// GET the edit view of a Project: its members and the links to its uploaded lists
#[utoipa::path(
    get,
    path = "/admin/projects/{id}",
    params(("id" = i32, Path, description = "Project id to retrieve")),
    responses(
        (status = 200, description = "Successfully retrieved a Project", body = ProjectEdit),
        (status = 404, description = "Project not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn read(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    let edit = ProjectApi::find_edit(app_state.db_conn_ref(), id).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        ProjectEdit::from(edit),
    )))
}

#[utoipa::path(
    put,
    path = "/admin/projects/{id}",
    params(("id" = i32, Path, description = "Project id to update")),
    request_body = UpdateParams,
    responses(
        (status = 200, description = "Successfully updated a Project", body = projects::Model),
        (status = 404, description = "Project not found"),
        (status = 409, description = "A project with this name exists"),
        (status = 422, description = "Invalid field"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn update(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
    JsonBody(params): JsonBody<UpdateParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("UPDATE Project {id} with: {params:?}");

    let project =
        ProjectApi::update(app_state.db_conn_ref(), id, params.into_update_map()).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), project)))
}

/// DELETE a Project with its annotations, memberships, links and uploaded lists
#[utoipa::path(
    delete,
    path = "/admin/projects/{id}",
    params(("id" = i32, Path, description = "Project id to delete")),
    responses(
        (status = 204, description = "Successfully deleted a Project"),
        (status = 404, description = "Project not found"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete(
    State(app_state): State<AppState>,
    Path(id): Path<Id>,
) -> Result<impl IntoResponse, Error> {
    info!("DELETE Project {id}");

    ProjectApi::delete(app_state.db_conn_ref(), &app_state.config, id).await?;

    Ok(Json(ApiResponse::<()>::no_content(
        StatusCode::NO_CONTENT.into(),
    )))
}
