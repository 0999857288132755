pub mod ticker_service;
pub mod ingestion_service;
pub mod retention_service;
pub mod news_service;

pub use ticker_service::{ TickerCache, TickerRead, TickerStore };
pub use ingestion_service::{ IngestionSettings, IngestionSummary, NewsIngestionJob };
pub use retention_service::{ RetentionSweepJob, SweepSummary };
pub use news_service::{ NewsPage, NewsService };
