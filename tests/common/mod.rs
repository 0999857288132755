// Shared fixtures for the integration tests: an in-memory SQLite database with
// the real migrations, and in-process fakes for every upstream.
#![allow(dead_code)]

use std::collections::{ HashMap, HashSet };
use std::sync::atomic::{ AtomicBool, Ordering };
use std::sync::{ Arc, Mutex };

use async_trait::async_trait;
use chrono::{ DateTime, TimeZone, Utc };
use migration::MigratorTrait;
use sea_orm::{ Database, DatabaseConnection };

use base_pulse::clock::ManualClock;
use base_pulse::config::tokens;
use base_pulse::db::{ NewSource, SourceRepository };
use base_pulse::enums::{ Category, Priority };
use base_pulse::error::{ AppError, Result };
use base_pulse::providers::{
    Cast,
    CastAuthor,
    CastEmbed,
    CastFeed,
    FeedReader,
    MarketData,
    NormalizedItem,
    TickerSnapshot,
    TokenQuote,
};
use base_pulse::services::TickerStore;

pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:").await.expect("connect sqlite");
    migration::Migrator::up(&db, None).await.expect("run migrations");
    db
}

/// Whole seconds only: SQLite compares timestamps as text.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(t0()))
}

pub async fn create_source(
    repo: &SourceRepository,
    name: &str,
    fid: Option<&str>,
    rss_url: Option<&str>,
    category: Category
) -> base_pulse::db::source::Model {
    repo.create(NewSource {
        name: name.to_string(),
        farcaster_username: Some(name.to_lowercase()),
        farcaster_fid: fid.map(str::to_string),
        website_url: None,
        logo_url: None,
        rss_url: rss_url.map(str::to_string),
        category,
        priority: Priority::Normal,
    }).await.expect("create source")
}

pub fn cast(username: &str, hash: &str, text: &str, at: DateTime<Utc>) -> Cast {
    Cast {
        hash: hash.to_string(),
        text: text.to_string(),
        timestamp: at,
        author: CastAuthor {
            fid: 1,
            username: username.to_string(),
            display_name: None,
            pfp_url: None,
        },
        embeds: Vec::<CastEmbed>::new(),
    }
}

pub fn quote(symbol: &str, price: f64, change: f64) -> TokenQuote {
    TokenQuote {
        symbol: symbol.to_string(),
        price: Some(price),
        change_24h: Some(change),
    }
}

// ---------------------------------------------------------------------------
// Market data

#[derive(Default)]
pub struct FakeMarket {
    quotes: Mutex<HashMap<String, TokenQuote>>,
    calls: Mutex<HashMap<String, usize>>,
    down: AtomicBool,
    delay: Mutex<Option<std::time::Duration>>,
}

impl FakeMarket {
    /// ETH at 3000 and four movers with changes [+5, -3, +12, -8].
    pub fn with_defaults() -> Self {
        let market = Self::default();
        market.set_quote(tokens::WETH, quote("WETH", 3000.0, 1.5));
        market.set_quote(tokens::AERO, quote("AERO", 1.2, 5.0));
        market.set_quote(tokens::DEGEN, quote("DEGEN", 0.01, -3.0));
        market.set_quote(tokens::BRETT, quote("BRETT", 0.1, 12.0));
        market.set_quote(tokens::TOSHI, quote("TOSHI", 0.0002, -8.0));
        market
    }

    pub fn set_quote(&self, address: &str, quote: TokenQuote) {
        self.quotes.lock().unwrap().insert(address.to_string(), quote);
    }

    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    /// Delay every price response by `delay`.
    pub fn set_delay(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn calls_for(&self, address: &str) -> usize {
        self.calls.lock().unwrap().get(address).copied().unwrap_or(0)
    }
}

#[async_trait]
impl MarketData for FakeMarket {
    async fn fetch_price(&self, token_address: &str) -> Result<Option<TokenQuote>> {
        *self.calls.lock().unwrap().entry(token_address.to_string()).or_default() += 1;
        // Yield so concurrent readers really interleave
        tokio::task::yield_now().await;

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.down.load(Ordering::SeqCst) {
            return Err(AppError::External("market down".to_string()));
        }
        Ok(self.quotes.lock().unwrap().get(token_address).cloned())
    }
}

// ---------------------------------------------------------------------------
// Casts

#[derive(Default)]
pub struct FakeCasts {
    casts: Mutex<HashMap<String, Vec<Cast>>>,
    failing: Mutex<HashSet<String>>,
    fids: Mutex<HashMap<String, i64>>,
    requested_limits: Mutex<Vec<u32>>,
    slow: Mutex<HashMap<String, std::time::Duration>>,
}

impl FakeCasts {
    pub fn set_casts(&self, fid: &str, casts: Vec<Cast>) {
        self.casts.lock().unwrap().insert(fid.to_string(), casts);
    }

    pub fn fail_for(&self, fid: &str) {
        self.failing.lock().unwrap().insert(fid.to_string());
    }

    pub fn set_fid(&self, username: &str, fid: i64) {
        self.fids.lock().unwrap().insert(username.to_lowercase(), fid);
    }

    /// Delay responses for `fid` by `delay`.
    pub fn slow_for(&self, fid: &str, delay: std::time::Duration) {
        self.slow.lock().unwrap().insert(fid.to_string(), delay);
    }

    pub fn requested_limits(&self) -> Vec<u32> {
        self.requested_limits.lock().unwrap().clone()
    }
}

#[async_trait]
impl CastFeed for FakeCasts {
    async fn fetch_casts(&self, fid: &str, limit: u32) -> Result<Vec<Cast>> {
        self.requested_limits.lock().unwrap().push(limit);

        let delay = self.slow.lock().unwrap().get(fid).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(fid) {
            return Err(AppError::External(format!("casts for {} unavailable", fid)));
        }
        let casts = self.casts.lock().unwrap().get(fid).cloned().unwrap_or_default();
        Ok(casts.into_iter().take(limit as usize).collect())
    }

    async fn fetch_fids_by_usernames(&self, usernames: &[String]) -> Result<HashMap<String, i64>> {
        let fids = self.fids.lock().unwrap();
        Ok(
            usernames
                .iter()
                .filter_map(|u| fids.get(&u.to_lowercase()).map(|fid| (u.to_lowercase(), *fid)))
                .collect()
        )
    }
}

// ---------------------------------------------------------------------------
// Feeds

#[derive(Default)]
pub struct FakeFeeds {
    feeds: Mutex<HashMap<String, Vec<NormalizedItem>>>,
}

impl FakeFeeds {
    pub fn set_items(&self, url: &str, items: Vec<NormalizedItem>) {
        self.feeds.lock().unwrap().insert(url.to_string(), items);
    }
}

#[async_trait]
impl FeedReader for FakeFeeds {
    async fn parse(&self, feed_url: &str) -> Vec<NormalizedItem> {
        self.feeds.lock().unwrap().get(feed_url).cloned().unwrap_or_default()
    }
}

pub fn feed_item(title: &str, link: Option<&str>, at: DateTime<Utc>) -> NormalizedItem {
    NormalizedItem {
        title: title.to_string(),
        content: format!("{} body", title),
        link: link.map(str::to_string),
        image_url: None,
        published_at: at,
    }
}

// ---------------------------------------------------------------------------
// Ticker store

#[derive(Default)]
pub struct MemoryTickerStore {
    snapshot: Mutex<Option<TickerSnapshot>>,
    fail_saves: AtomicBool,
}

impl MemoryTickerStore {
    pub fn with(snapshot: TickerSnapshot) -> Self {
        let store = Self::default();
        *store.snapshot.lock().unwrap() = Some(snapshot);
        store
    }

    pub fn current(&self) -> Option<TickerSnapshot> {
        self.snapshot.lock().unwrap().clone()
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TickerStore for MemoryTickerStore {
    async fn load(&self) -> Result<Option<TickerSnapshot>> {
        Ok(self.current())
    }

    async fn save(&self, snapshot: &TickerSnapshot) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(AppError::Internal("store unavailable".to_string()));
        }
        *self.snapshot.lock().unwrap() = Some(snapshot.clone());
        Ok(())
    }
}
