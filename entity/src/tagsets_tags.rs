use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(schema_name = "phaunos", table_name = "tagsets_tags")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tagset_id: Id,
    #[sea_orm(primary_key, auto_increment = false)]
    pub tag_id: Id,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tagsets::Entity",
        from = "Column::TagsetId",
        to = "super::tagsets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tagsets,
    #[sea_orm(
        belongs_to = "super::tags::Entity",
        from = "Column::TagId",
        to = "super::tags::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Tags,
}

impl Related<super::tagsets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tagsets.def()
    }
}

impl Related<super::tags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
