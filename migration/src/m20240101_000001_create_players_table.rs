use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Players::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Players::Icon).string().not_null().default(""))
                    .col(counter(Players::PlayerScore))
                    .col(counter(Players::ComputerScore))
                    .col(counter(Players::PlayerWins))
                    .col(counter(Players::ComputerWins))
                    .col(counter(Players::TotalRounds))
                    // Comma-joined lowercase choices, oldest first
                    .col(
                        ColumnDef::new(Players::PlayerHistory)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Players::ComputerHistory)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_players_player_wins")
                    .table(Players::Table)
                    .col(Players::PlayerWins)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Players::Table).to_owned())
            .await
    }
}

fn counter(column: Players) -> ColumnDef {
    ColumnDef::new(column)
        .integer()
        .not_null()
        .default(0)
        .to_owned()
}

#[derive(DeriveIden)]
enum Players {
    Table,
    Id,
    Name,
    Icon,
    PlayerScore,
    ComputerScore,
    PlayerWins,
    ComputerWins,
    TotalRounds,
    PlayerHistory,
    ComputerHistory,
    CreatedAt,
    UpdatedAt,
}
