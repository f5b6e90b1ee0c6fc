use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = entity::tags::Model)] // OpenAPI schema
#[sea_orm(schema_name = "phaunos", table_name = "tags")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
    #[sea_orm(has_many = "super::tagsets_tags::Entity")]
    TagsetsTags,
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl Related<super::tagsets_tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TagsetsTags.def()
    }
}

impl Related<super::tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        super::tagsets_tags::Relation::Tagsets.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::tagsets_tags::Relation::Tags.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
