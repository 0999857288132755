pub mod source;
pub mod news_item;
pub mod ticker_cache;

pub use source::Entity as Source;
pub use news_item::Entity as NewsItem;
pub use ticker_cache::Entity as TickerCache;
