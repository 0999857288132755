use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Sources::Table)
                .if_not_exists()
                .col(ColumnDef::new(Sources::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(Sources::Name).string().not_null())
                .col(ColumnDef::new(Sources::FarcasterUsername).string())
                .col(ColumnDef::new(Sources::FarcasterFid).string())
                .col(ColumnDef::new(Sources::WebsiteUrl).string())
                .col(ColumnDef::new(Sources::LogoUrl).string())
                .col(ColumnDef::new(Sources::RssUrl).string())
                .col(ColumnDef::new(Sources::Category).string().not_null()) // "OFFICIAL", "DEFI", ...
                .col(ColumnDef::new(Sources::Priority).string().not_null().default("NORMAL"))
                .col(
                    ColumnDef::new(Sources::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(
                    ColumnDef::new(Sources::UpdatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_sources_category")
                .table(Sources::Table)
                .col(Sources::Category)
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Sources::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub enum Sources {
    Table,
    Id,
    Name,
    FarcasterUsername,
    FarcasterFid,
    WebsiteUrl,
    LogoUrl,
    RssUrl,
    Category,
    Priority,
    CreatedAt,
    UpdatedAt,
}
