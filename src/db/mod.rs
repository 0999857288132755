pub mod entity;
pub use entity::*;

mod source_repository;
pub use source_repository::{ NewSource, SourceRepository };

mod news_repository;
pub use news_repository::{ NewNewsItem, NewsFilter, NewsRepository, NewsWithSource };

mod ticker_repository;
pub use ticker_repository::TickerRepository;
