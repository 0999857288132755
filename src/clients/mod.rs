pub mod dexscreener;
pub mod neynar;
pub mod rss_feed;

pub use dexscreener::DexScreenerClient;
pub use neynar::NeynarClient;
pub use rss_feed::RssFeedReader;
