use serde::Serialize;
use utoipa::ToSchema;

/// Represents a freshly issued pair of JSON Web Tokens.
/// Note: This struct does not have a corresponding entity in the database.
///
/// - `access_token`: short lived token presented on every authenticated request.
/// - `refresh_token`: long lived token used only to obtain new access tokens. It is
///   absent when an access token is reissued from an existing refresh token.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[schema(as = jwt::Jwt)] // OpenAPI schema
pub struct Jwt {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}
