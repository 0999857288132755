use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TickerCache::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TickerCache::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(TickerCache::Data).json().not_null())
                    .col(
                        ColumnDef::new(TickerCache::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TickerCache::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum TickerCache {
    Table,
    Id,
    Data,
    UpdatedAt,
}
