use serde::Deserialize;
use utoipa::ToSchema;

use domain::Id;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateParams {
    pub name: String,
    #[serde(default)]
    pub tag_ids: Vec<Id>,
}

/// Omitting `tag_ids` keeps the current tags; an empty list removes them all.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateParams {
    pub name: String,
    pub tag_ids: Option<Vec<Id>>,
}
