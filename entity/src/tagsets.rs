use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = entity::tagsets::Model)] // OpenAPI schema
#[sea_orm(schema_name = "phaunos", table_name = "tagsets")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tagsets_tags::Entity")]
    TagsetsTags,
    #[sea_orm(has_many = "super::projects_tagsets::Entity")]
    ProjectsTagsets,
}

impl Related<super::tagsets_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagsetsTags.def()
    }
}

impl Related<super::projects_tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectsTagsets.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        super::tagsets_tags::Relation::Tags.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tagsets_tags::Relation::Tagsets.def().rev())
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        super::projects_tagsets::Relation::Projects.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::projects_tagsets::Relation::Tagsets.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
