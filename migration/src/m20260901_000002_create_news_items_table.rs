use sea_orm_migration::prelude::*;

use crate::m20260901_000001_create_sources_table::Sources;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(NewsItems::Table)
                .if_not_exists()
                .col(ColumnDef::new(NewsItems::Id).uuid().not_null().primary_key())
                .col(ColumnDef::new(NewsItems::SourceId).uuid().not_null())
                .col(ColumnDef::new(NewsItems::Title).string().not_null())
                .col(ColumnDef::new(NewsItems::Content).text())
                .col(ColumnDef::new(NewsItems::ImageUrl).string())
                .col(ColumnDef::new(NewsItems::OriginalLink).string())
                .col(ColumnDef::new(NewsItems::SourceKind).string().not_null()) // "FARCASTER", "RSS"
                .col(
                    ColumnDef::new(NewsItems::CreatedAt)
                        .timestamp_with_time_zone()
                        .not_null()
                        .default(Expr::current_timestamp())
                )
                .col(ColumnDef::new(NewsItems::ExpiresAt).timestamp_with_time_zone().not_null())
                .col(ColumnDef::new(NewsItems::Likes).integer().not_null().default(0))
                .foreign_key(
                    ForeignKey::create()
                        .name("fk_news_items_source_id")
                        .from(NewsItems::Table, NewsItems::SourceId)
                        .to(Sources::Table, Sources::Id)
                        .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // One item per (source, canonical link); ingestion inserts with ON CONFLICT DO NOTHING
        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_news_items_source_link")
                .table(NewsItems::Table)
                .col(NewsItems::SourceId)
                .col(NewsItems::OriginalLink)
                .unique()
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_news_items_expires_at")
                .table(NewsItems::Table)
                .col(NewsItems::ExpiresAt)
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create()
                .if_not_exists()
                .name("idx_news_items_created_at")
                .table(NewsItems::Table)
                .col((NewsItems::CreatedAt, IndexOrder::Desc))
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(NewsItems::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum NewsItems {
    Table,
    Id,
    SourceId,
    Title,
    Content,
    ImageUrl,
    OriginalLink,
    SourceKind,
    CreatedAt,
    ExpiresAt,
    Likes,
}
