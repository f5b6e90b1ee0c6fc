use crate::extractors::authenticated_user::AuthenticatedUser;
use axum::{extract::Request, middleware::Next, response::Response};

/// Authentication middleware: requests without a valid access token are answered with
/// `401 Unauthorized` before reaching any handler.
///
/// Running the extractor here also leaves the user in the request extensions for the
/// `protect` layers and handlers behind it.
pub async fn require_auth(
    AuthenticatedUser(_user): AuthenticatedUser,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
