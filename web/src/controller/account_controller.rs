use crate::controller::ApiResponse;
use crate::extractors::{json_body::JsonBody, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
use crate::params::user::{CreateUserParams, LoginParams, LoginQuery, RequestConfirmationParams};
use crate::{AppState, Error};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use domain::user as UserApi;
use log::*;
use serde_json::json;

/// Registers a new, unconfirmed account and mails its confirmation link
#[utoipa::path(
    post,
    path = "/api/user/create_user",
    request_body = CreateUserParams,
    responses(
        (status = 201, description = "Account created, confirmation email sent"),
        (status = 400, description = "Invalid username, email or password"),
        (status = 409, description = "Username or email already registered"),
    )
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<CreateUserParams>,
) -> Result<impl IntoResponse, Error> {
    debug!("CREATE new account for {}", params.username);

    let user = UserApi::register(app_state.db_conn_ref(), &app_state.config, params.into()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(
            StatusCode::CREATED.into(),
            json!({
                "msg": format!("Successfully created user: {}. Please confirm email.", user.email)
            }),
        )),
    ))
}

/// Sends a new confirmation link
#[utoipa::path(
    post,
    path = "/api/user/request_confirmation_email",
    request_body = RequestConfirmationParams,
    responses(
        (status = 200, description = "Confirmation email sent"),
        (status = 400, description = "Unknown or already confirmed email"),
    )
)]
pub async fn request_confirmation_email(
    State(app_state): State<AppState>,
    JsonBody(params): JsonBody<RequestConfirmationParams>,
) -> Result<impl IntoResponse, Error> {
    let email = params.email.trim();
    UserApi::request_confirmation(app_state.db_conn_ref(), &app_state.config, email).await?;

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({ "msg": format!("A confirmation email has been sent to {email}") }),
    )))
}

/// Confirms the account a confirmation link was sent to
#[utoipa::path(
    get,
    path = "/api/user/confirm/{token}",
    params(("token" = String, Path, description = "Token from the confirmation link")),
    responses(
        (status = 200, description = "Account confirmed"),
        (status = 400, description = "Invalid, expired or already used link"),
    )
)]
pub async fn confirm(
    State(app_state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let user = UserApi::confirm(app_state.db_conn_ref(), &app_state.config, &token).await?;
    debug!("Confirmed account {}", user.username);

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({ "msg": "You have confirmed your account. Thank you!" }),
    )))
}

/// Logs a user in
///
/// With `web=1` both tokens are set as HttpOnly cookies and only the username is returned.
/// Otherwise the tokens are returned in the body.
#[utoipa::path(
    post,
    path = "/api/user/login",
    params(LoginQuery),
    request_body = LoginParams,
    responses(
        (status = 200, description = "Logged in"),
        (status = 400, description = "Unknown user or unconfirmed email"),
        (status = 401, description = "Invalid password"),
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    Query(query): Query<LoginQuery>,
    jar: CookieJar,
    JsonBody(params): JsonBody<LoginParams>,
) -> Result<Response, Error> {
    let (user, jwt) = UserApi::login(
        app_state.db_conn_ref(),
        &app_state.config,
        params.username.trim(),
        &params.password,
    )
    .await?;

    if query.web {
        let secure = app_state.config.is_production();
        let mut jar = jar.add(token_cookie(ACCESS_TOKEN_COOKIE, jwt.access_token, secure));
        if let Some(refresh_token) = jwt.refresh_token {
            jar = jar.add(token_cookie(REFRESH_TOKEN_COOKIE, refresh_token, secure));
        }

        return Ok((
            jar,
            Json(ApiResponse::new(
                StatusCode::OK.into(),
                json!({ "username": user.username }),
            )),
        )
            .into_response());
    }

    Ok(Json(ApiResponse::new(
        StatusCode::OK.into(),
        json!({
            "msg": format!("Logged as {}", user.username),
            "access_token": jwt.access_token,
            "refresh_token": jwt.refresh_token,
        }),
    ))
    .into_response())
}

/// Clears the token cookies
#[utoipa::path(
    get,
    path = "/api/user/logout",
    responses((status = 200, description = "Token cookies removed"))
)]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar
        .remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/"))
        .remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/"));

    (
        jar,
        Json(ApiResponse::<()>::no_content(StatusCode::OK.into())),
    )
}

fn token_cookie(name: &'static str, token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_cookies_are_http_only_and_site_wide() {
        let cookie = token_cookie(ACCESS_TOKEN_COOKIE, "abc".to_owned(), true);

        assert_eq!(cookie.name(), "access_token_cookie");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }
}
