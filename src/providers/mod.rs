pub mod market_data;
pub mod cast_feed;
pub mod feed_reader;

pub use market_data::{ fetch_snapshot, select_top_movers, MarketData, TickerSnapshot, TokenQuote, TopMovers };
pub use cast_feed::{ canonical_link, is_image_url, Cast, CastAuthor, CastEmbed, CastFeed, EmbedMetadata };
pub use feed_reader::{ FeedReader, NormalizedItem };
