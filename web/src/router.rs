use crate::{
    controller::health_check_controller, middleware::auth::require_auth, params, protect,
    response, AppState,
};
use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::services::ServeDir;

use crate::controller::{
    account_controller, admin, annotation_controller, audio_controller, project_controller,
    tag_controller, tagset_controller, token_controller, user_controller,
};

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_rapidoc::RapiDoc;

/// Largest accepted project creation form, list files included.
const PROJECT_FORM_LIMIT: usize = 16 * 1024 * 1024;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Phaunos API"
        ),
        paths(
            health_check_controller::health_check,
            project_controller::index,
            project_controller::read,
            tagset_controller::index,
            tagset_controller::read,
            tag_controller::index,
            tag_controller::read,
            audio_controller::index,
            annotation_controller::index,
            annotation_controller::create,
            user_controller::index,
            account_controller::create_user,
            account_controller::request_confirmation_email,
            account_controller::confirm,
            account_controller::login,
            account_controller::logout,
            token_controller::refresh,
            admin::user_controller::index,
            admin::user_controller::read,
            admin::user_controller::update,
            admin::user_controller::delete,
            admin::tag_controller::index,
            admin::tag_controller::read,
            admin::tag_controller::create,
            admin::tag_controller::update,
            admin::tag_controller::delete,
            admin::tagset_controller::index,
            admin::tagset_controller::read,
            admin::tagset_controller::create,
            admin::tagset_controller::update,
            admin::tagset_controller::delete,
            admin::project_controller::index,
            admin::project_controller::create,
            admin::project_controller::read,
            admin::project_controller::update,
            admin::project_controller::delete,
            admin::audio_controller::delete,
            admin::membership_controller::upsert,
            admin::membership_controller::delete,
        ),
        components(
            schemas(
                domain::annotations::Model,
                domain::audios::Model,
                domain::memberships::Model,
                domain::projects::Model,
                domain::tags::Model,
                domain::tagsets::Model,
                domain::users::Model,
                domain::Role,
                domain::VisualizationType,
                domain::jwt::Jwt,
                params::annotation::CreateParams,
                params::project::NewProjectForm,
                params::project::UpdateParams,
                params::project::MembershipParams,
                params::tag::TagParams,
                params::tagset::CreateParams,
                params::tagset::UpdateParams,
                params::user::CreateUserParams,
                params::user::RequestConfirmationParams,
                params::user::LoginParams,
                params::user::UpdateUserParams,
                response::project::ProjectDetail,
                response::project::ProjectEdit,
                response::project::Member,
                response::tagset::TagsetWithTags,
                response::user::UserWithMemberships,
                response::user::ProjectRole,
            )
        ),
        modifiers(&SecurityAddon),
        tags(
            (name = "phaunos", description = "Audio annotation API")
        )
    )]
struct ApiDoc;

struct SecurityAddon;

// Access tokens travel as bearer tokens, or in the access token cookie set by a web login.
impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(project_routes(app_state.clone()))
        .merge(tagset_routes(app_state.clone()))
        .merge(tag_routes(app_state.clone()))
        .merge(audio_routes(app_state.clone()))
        .merge(annotation_routes(app_state.clone()))
        .merge(user_routes(app_state.clone()))
        .merge(account_routes(app_state.clone()))
        .merge(token_routes(app_state.clone()))
        .merge(admin_routes(app_state.clone()))
        .merge(admin_membership_routes(app_state.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .merge(static_routes(&app_state))
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn project_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/projects", get(project_controller::index))
        .merge(
            // GET /api/phaunos/projects/{id}
            Router::new()
                .route(
                    "/api/phaunos/projects/{id}",
                    get(project_controller::read),
                )
                .route_layer(from_fn_with_state(app_state.clone(), protect::projects::read))
                .route_layer(from_fn_with_state(app_state.clone(), require_auth)),
        )
        .with_state(app_state)
}

fn tagset_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/tagsets", get(tagset_controller::index))
        .route("/api/phaunos/tagsets/{id}", get(tagset_controller::read))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn tag_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/tags", get(tag_controller::index))
        .route("/api/phaunos/tags/{id}", get(tag_controller::read))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn audio_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/audios", get(audio_controller::index))
        .route_layer(from_fn_with_state(app_state.clone(), protect::audios::index))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn annotation_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/annotations", post(annotation_controller::create))
        .merge(
            // GET /api/phaunos/annotations
            Router::new()
                .route(
                    "/api/phaunos/annotations",
                    get(annotation_controller::index),
                )
                .route_layer(from_fn_with_state(
                    app_state.clone(),
                    protect::annotations::index,
                )),
        )
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn user_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/phaunos/users", get(user_controller::index))
        .route_layer(from_fn_with_state(app_state.clone(), protect::users::index))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn account_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/api/user/create_user",
            post(account_controller::create_user),
        )
        .route(
            "/api/user/request_confirmation_email",
            post(account_controller::request_confirmation_email),
        )
        .route(
            "/api/user/confirm/{token}",
            get(account_controller::confirm),
        )
        .route("/api/user/login", post(account_controller::login))
        .route("/api/user/logout", get(account_controller::logout))
        .with_state(app_state)
}

fn token_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/token/refresh", post(token_controller::refresh))
        .with_state(app_state)
}

fn admin_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/admin/users", get(admin::user_controller::index))
        .route("/admin/users/{id}", get(admin::user_controller::read))
        .route("/admin/users/{id}", put(admin::user_controller::update))
        .route("/admin/users/{id}", delete(admin::user_controller::delete))
        .route("/admin/tags", get(admin::tag_controller::index))
        .route("/admin/tags", post(admin::tag_controller::create))
        .route("/admin/tags/{id}", get(admin::tag_controller::read))
        .route("/admin/tags/{id}", put(admin::tag_controller::update))
        .route("/admin/tags/{id}", delete(admin::tag_controller::delete))
        .route("/admin/tagsets", get(admin::tagset_controller::index))
        .route("/admin/tagsets", post(admin::tagset_controller::create))
        .route("/admin/tagsets/{id}", get(admin::tagset_controller::read))
        .route("/admin/tagsets/{id}", put(admin::tagset_controller::update))
        .route(
            "/admin/tagsets/{id}",
            delete(admin::tagset_controller::delete),
        )
        .route("/admin/projects", get(admin::project_controller::index))
        .route(
            "/admin/projects",
            post(admin::project_controller::create)
                .layer(DefaultBodyLimit::max(PROJECT_FORM_LIMIT)),
        )
        .route("/admin/projects/{id}", get(admin::project_controller::read))
        .route("/admin/projects/{id}", put(admin::project_controller::update))
        .route(
            "/admin/projects/{id}",
            delete(admin::project_controller::delete),
        )
        .route("/admin/audios/{id}", delete(admin::audio_controller::delete))
        .route_layer(from_fn_with_state(app_state.clone(), protect::admin::global_admin))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

fn admin_membership_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/admin/projects/{id}/memberships",
            put(admin::membership_controller::upsert),
        )
        .route(
            "/admin/projects/{id}/memberships/{user_id}",
            delete(admin::membership_controller::delete),
        )
        .route_layer(from_fn_with_state(app_state.clone(), protect::admin::memberships))
        .route_layer(from_fn_with_state(app_state.clone(), require_auth))
        .with_state(app_state)
}

/// Serves the uploaded list files read-only.
fn static_routes(app_state: &AppState) -> Router {
    Router::new().nest_service("/files", ServeDir::new(app_state.config.upload_folder()))
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod router_tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use clap::Parser;
    use domain::{annotations, audios, memberships, projects, users, Role, VisualizationType};
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use serde_json::{json, Value};
    use service::config::Config;
    use std::sync::Arc;
    use tower::ServiceExt;

    const SECRET: &str = "router-test-secret";

    fn config() -> Config {
        Config::parse_from(["phaunos", "--jwt-secret-key", SECRET])
    }

    fn app(db: DatabaseConnection) -> Router {
        define_routes(AppState::new(config(), &Arc::new(db)))
    }

    fn user(id: i32, is_admin: bool) -> users::Model {
        let now = chrono::Utc::now();
        users::Model {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@test.com"),
            password: password_auth::generate_hash("password1"),
            is_admin,
            confirmed_on: Some(now.into()),
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn project() -> projects::Model {
        let now = chrono::Utc::now();
        projects::Model {
            id: 1,
            name: "birds".to_owned(),
            visualization_type: VisualizationType::Spectrogram,
            allow_regions: true,
            audiolist_filename: None,
            taglist_filename: None,
            n_annotations_per_file: None,
            created_by_id: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    fn membership(user_id: i32, role: Role) -> memberships::Model {
        memberships::Model {
            user_id,
            project_id: 1,
            role,
        }
    }

    fn get_as(username: &str, uri: &str) -> Request<Body> {
        request_as("GET", username, uri)
    }

    fn request_as(method: &str, username: &str, uri: &str) -> Request<Body> {
        let token = domain::jwt::create_access_token(&config(), username, true).unwrap();
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_responds_without_a_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_an_access_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .uri("/api/phaunos/tags")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            json_body(response).await,
            json!({"messages": ["Missing access token."]})
        );
    }

    #[tokio::test]
    async fn tagsets_without_project_id_are_unprocessable() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/tagsets"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            json_body(response).await,
            json!({"messages": ["Missing project_id parameter."]})
        );
    }

    #[tokio::test]
    async fn plain_members_may_not_list_project_audios() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .append_query_results([vec![project()]])
            .append_query_results([vec![membership(2, Role::Member)]])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/audios?project_id=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await, json!({"messages": ["Not allowed."]}));
    }

    #[tokio::test]
    async fn project_admins_list_project_audios() {
        let audio = audios::Model {
            id: 4,
            path: "birds/a.wav".to_owned(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .append_query_results([vec![project()]])
            .append_query_results([vec![membership(2, Role::Admin)]])
            .append_query_results([vec![audio]])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/audios?project_id=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({"status_code": 200, "data": [{"id": 4, "path": "birds/a.wav"}]})
        );
    }

    #[tokio::test]
    async fn audios_of_an_unknown_project_are_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .append_query_results([Vec::<projects::Model>::new()])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/audios?project_id=9"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"messages": ["Project with id 9 not found"]})
        );
    }

    #[tokio::test]
    async fn listing_every_user_takes_a_global_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/users"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn the_admin_api_refuses_non_admins() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/admin/tags"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn login_returns_both_tokens_in_the_body() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/user/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"username": "user3", "password": "password1"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["data"]["msg"], json!("Logged as user3"));
        assert!(body["data"]["access_token"].is_string());
        assert!(body["data"]["refresh_token"].is_string());
    }

    #[tokio::test]
    async fn web_login_sets_the_token_cookies() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/user/login?web=1")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"username": "user3", "password": "password1"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<String> = response
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|value| value.to_str().unwrap().to_owned())
            .collect();
        assert!(cookies
            .iter()
            .any(|c| c.starts_with("access_token_cookie=") && c.contains("HttpOnly")));
        assert!(cookies.iter().any(|c| c.starts_with("refresh_token_cookie=")));
        assert_eq!(
            json_body(response).await,
            json!({"status_code": 200, "data": {"username": "user3"}})
        );
    }

    #[tokio::test]
    async fn a_wrong_password_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(3, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/user/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({"username": "user3", "password": "nope"}).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn project_admins_export_every_annotation_as_an_attachment() {
        let now = chrono::Utc::now();
        let annotations: Vec<annotations::Model> = (1..=12)
            .map(|id| annotations::Model {
                id,
                start_time: f64::from(id),
                end_time: None,
                tag_id: 1,
                project_id: 1,
                audio_id: 4,
                user_id: 3,
                created_at: now.into(),
            })
            .collect();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .append_query_results([vec![project()]])
            .append_query_results([vec![membership(2, Role::Admin)]])
            .append_query_results([annotations])
            .into_connection();

        let response = app(db)
            .oneshot(get_as("user2", "/api/phaunos/annotations?project_id=1&web=1"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment;filename=annotations.json"
        );
        let body = json_body(response).await;
        let exported = body.as_array().expect("a bare JSON array");
        assert_eq!(exported.len(), 12);
        assert_eq!(exported[0]["id"], json!(1));
        assert_eq!(exported[11]["user_id"], json!(3));
    }

    #[tokio::test]
    async fn global_admins_delete_an_audio() {
        let audio = audios::Model {
            id: 4,
            path: "birds/a.wav".to_owned(),
        };
        let deleted = || MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(1, true)]])
            .append_query_results([vec![audio]])
            .append_exec_results([deleted(), deleted(), deleted()])
            .into_connection();

        let response = app(db)
            .oneshot(request_as("DELETE", "user1", "/admin/audios/4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status_code": 204}));
    }

    #[tokio::test]
    async fn deleting_an_audio_takes_a_global_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![user(2, false)]])
            .into_connection();

        let response = app(db)
            .oneshot(request_as("DELETE", "user2", "/admin/audios/4"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
