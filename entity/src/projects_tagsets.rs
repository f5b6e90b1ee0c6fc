use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "phaunos", table_name = "projects_tagsets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub project_id: Id,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tagset_id: Id,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::projects::Entity",
        from = "Column::ProjectId",
        to = "super::projects::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Projects,
    #[sea_orm(
        belongs_to = "super::tagsets::Entity",
        from = "Column::TagsetId",
        to = "super::tagsets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tagsets,
}

impl Related<super::projects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Projects.def()
    }
}

impl Related<super::tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tagsets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
