use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum BugStatus {
    #[sea_orm(string_value = "Open")]
    Open,
    #[sea_orm(string_value = "Closed")]
    Closed,
}

#[derive(Debug, Clone, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bug")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub group_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: BugStatus,
    pub created_by: Uuid,
    // reporter's username at filing time
    pub created_by_name: String,
    pub start_date: Option<DateTimeUtc>,
    pub due_date: Option<DateTimeUtc>,
    pub estimated_hours: Option<i32>,
    /// Path relative to the media root, e.g. `bugs/<uuid>_trace.log`.
    pub attachment: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bug_group::Entity",
        from = "Column::GroupId",
        to   = "super::bug_group::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    BugGroup,
}

impl Related<super::bug_group::Entity> for Entity {
    fn to() -> RelationDef { Relation::BugGroup.def() }
}

impl ActiveModelBehavior for ActiveModel {}
