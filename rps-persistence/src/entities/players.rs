use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub icon: String,
    pub player_score: i32,
    pub computer_score: i32,
    pub player_wins: i32,
    pub computer_wins: i32,
    pub total_rounds: i32,
    #[sea_orm(column_type = "Text")]
    pub player_history: String,
    #[sea_orm(column_type = "Text")]
    pub computer_history: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
