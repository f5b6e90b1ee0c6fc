use crate::{visualization_type::VisualizationType, Id};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, ToSchema, Serialize, Deserialize)]
#[schema(as = entity::projects::Model)] // OpenAPI schema
#[sea_orm(schema_name = "phaunos", table_name = "projects")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,
    #[sea_orm(unique)]
    pub name: String,
    pub visualization_type: VisualizationType,
    /// When false, annotators may only place point annotations (no end time).
    pub allow_regions: bool,
    /// Generated name of the uploaded audio list, relative to `audiolist_filenames/`.
    #[serde(skip_deserializing)]
    pub audiolist_filename: Option<String>,
    /// Generated name of the uploaded tag list, relative to `taglist_filenames/`.
    #[serde(skip_deserializing)]
    pub taglist_filename: Option<String>,
    pub n_annotations_per_file: Option<i32>,
    #[serde(skip_deserializing)]
    pub created_by_id: Option<Id>,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub created_at: DateTimeWithTimeZone,
    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)] // Applies to OpenAPI schema
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::annotations::Entity")]
    Annotations,
    #[sea_orm(has_many = "super::memberships::Entity")]
    Memberships,
    #[sea_orm(has_many = "super::projects_audios::Entity")]
    ProjectsAudios,
    #[sea_orm(has_many = "super::projects_tagsets::Entity")]
    ProjectsTagsets,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedById",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Creator,
}

impl Related<super::annotations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl Related<super::memberships::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Memberships.def()
    }
}

impl Related<super::projects_audios::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectsAudios.def()
    }
}

impl Related<super::projects_tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectsTagsets.def()
    }
}

impl Related<super::audios::Entity> for Entity {
    fn to() -> RelationDef {
        super::projects_audios::Relation::Audios.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::projects_audios::Relation::Projects.def().rev())
    }
}

impl Related<super::tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        super::projects_tagsets::Relation::Tagsets.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::projects_tagsets::Relation::Projects.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
