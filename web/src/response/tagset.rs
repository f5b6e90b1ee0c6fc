use domain::tagset::TagsetWithTags as DomainTagsetWithTags;
use domain::{tags::Model as TagModel, tagsets::Model as TagsetModel};
use serde::Serialize;
use utoipa::ToSchema;

/// A tagset with its tags nested
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TagsetWithTags {
    #[serde(flatten)]
    pub tagset: TagsetModel,
    pub tags: Vec<TagModel>,
}

impl From<DomainTagsetWithTags> for TagsetWithTags {
    fn from((tagset, tags): DomainTagsetWithTags) -> Self {
        Self { tagset, tags }
    }
}
