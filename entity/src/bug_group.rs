use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bug_group")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub created_by: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedBy",
        to   = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::group_member::Entity")]
    GroupMember,
    #[sea_orm(has_many = "super::group_admin::Entity")]
    GroupAdmin,
    #[sea_orm(has_many = "super::bug::Entity")]
    Bug,
}

impl Related<super::group_member::Entity> for Entity {
    fn to() -> RelationDef { Relation::GroupMember.def() }
}

impl Related<super::group_admin::Entity> for Entity {
    fn to() -> RelationDef { Relation::GroupAdmin.def() }
}

impl Related<super::bug::Entity> for Entity {
    fn to() -> RelationDef { Relation::Bug.def() }
}

impl ActiveModelBehavior for ActiveModel {}
