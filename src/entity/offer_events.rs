//! 推广方案事件实体（仅追加）

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offer_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub experiment: String,
    pub variant: String,
    /// "impression" 或 "win"
    pub kind: String,
    pub user_id: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
