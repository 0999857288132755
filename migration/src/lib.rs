pub use sea_orm_migration::prelude::*;

mod m20260901_000001_create_sources_table;
mod m20260901_000002_create_news_items_table;
mod m20260901_000003_create_ticker_cache_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_sources_table::Migration),
            Box::new(m20260901_000002_create_news_items_table::Migration),
            Box::new(m20260901_000003_create_ticker_cache_table::Migration)
        ]
    }
}
