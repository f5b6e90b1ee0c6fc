use axum::http::{header, HeaderValue, Method};
use log::*;
use std::io;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use error::{Error, Result};
pub use service::AppState;

mod controller;
mod error;
pub(crate) mod extractors;
pub(crate) mod middleware;
pub(crate) mod params;
pub(crate) mod protect;
pub(crate) mod response;
pub mod router;

/// Binds to the configured interface and serves the API until the process is stopped.
pub async fn init_server(app_state: AppState) -> io::Result<()> {
    let interface = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let address = format!("{interface}:{}", app_state.config.port);

    let cors = cors_layer(&app_state.config.allowed_origins);
    let app = router::define_routes(app_state).layer(cors);

    let listener = TcpListener::bind(&address).await?;
    info!("Server starting... listening for connections on http://{address}");

    axum::serve(listener, app).await
}

/// Credentials are allowed so that the token cookies reach the API from the front end.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .allow_credentials(true)
}
