use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = entity::audios::Model)] // OpenAPI schema
#[sea_orm(schema_name = "phaunos", table_name = "audios")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    /// Path of the audio file, relative to the upload folder.
    #[sea_orm(unique)]
    pub path: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
    #[sea_orm(has_many = "super::projects_audios::Entity")]
    ProjectsAudios,
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl Related<super::projects_audios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectsAudios.def()
    }
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        super::projects_audios::Relation::Projects.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::projects_audios::Relation::Audios.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
