use crate::controller::ApiResponse;
use crate::extractors::refresh_token::RefreshToken;
use crate::{AppState, Error};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domain::jwt::Jwt;
use domain::user as UserApi;
use log::*;

/// POST a refresh token to obtain a new, non-fresh access token
#[utoipa::path(
    post,
    path = "/api/token/refresh",
    responses(
        (status = 200, description = "Successfully issued an access token", body = Jwt),
        (status = 401, description = "Missing, invalid or expired refresh token"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    RefreshToken(token): RefreshToken,
) -> Result<impl IntoResponse, Error> {
    let jwt = UserApi::refresh(app_state.db_conn_ref(), &app_state.config, &token).await?;
    debug!("Issued a new access token from a refresh token");

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), jwt)))
}
