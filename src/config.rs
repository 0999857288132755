use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_DEXSCREENER_API_URL: &str = "https://api.dexscreener.com/latest/dex";
pub const DEFAULT_NEYNAR_API_URL: &str = "https://api.neynar.com/v2";

/// Token contracts on Base used by the ticker.
pub mod tokens {
    pub const WETH: &str = "0x4200000000000000000000000000000000000006";
    pub const USDC: &str = "0x833589fCD6eDb6E08f4c7C32D4f71b54bdA02913";
    pub const AERO: &str = "0x940181a94A35A4569E4529A3CDfB74e38FD98631";
    pub const DEGEN: &str = "0x4ed4E862860beD51a9570b96d89aF5E1B0Efefed";
    pub const BRETT: &str = "0x532f27101965dd16442E59d406436946499b0389";
    pub const TOSHI: &str = "0xAC1Bd2486aAf3B5C0fc3Fd868558b082a531B2B4";

    /// Candidates ranked for the top gainer / top loser slots.
    pub const MOVER_CANDIDATES: [&str; 4] = [AERO, DEGEN, BRETT, TOSHI];
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub neynar_api_key: Option<String>,
    pub neynar_api_url: String,
    pub dexscreener_api_url: String,
    /// Shared secret for the cron trigger routes. `None` leaves them open.
    pub cron_secret: Option<String>,
    pub ticker_ttl: Duration,
    pub news_ttl_hours: i64,
    pub cast_fetch_limit: u32,
    pub recency_window_minutes: i64,
    pub ingest_budget: Duration,
    pub ingest_interval: Duration,
    pub cleanup_interval: Duration,
    pub enable_scheduler: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenv::dotenv().ok();

        let database_url = env::var("DATABASE_URL")?;

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let server_port = env_or("SERVER_PORT", 8080u16)?;

        let neynar_api_key = non_empty_var("NEYNAR_API_KEY");
        let neynar_api_url = env::var("NEYNAR_API_URL")
            .unwrap_or_else(|_| DEFAULT_NEYNAR_API_URL.to_string());
        let dexscreener_api_url = env::var("DEXSCREENER_API_URL")
            .unwrap_or_else(|_| DEFAULT_DEXSCREENER_API_URL.to_string());

        let cron_secret = non_empty_var("CRON_SECRET");
        if cron_secret.is_none() {
            tracing::warn!("CRON_SECRET is not set; cron trigger routes accept unauthenticated calls");
        }

        let ticker_ttl = Duration::from_secs(env_or("TICKER_TTL_SECS", 60u64)?);
        let news_ttl_hours = env_or("NEWS_TTL_HOURS", 48i64)?;
        let cast_fetch_limit = env_or("CAST_FETCH_LIMIT", 5u32)?;
        let recency_window_minutes = env_or("RECENCY_WINDOW_MINUTES", 60i64)?;
        let ingest_budget = Duration::from_secs(env_or("INGEST_BUDGET_SECS", 50u64)?);
        let ingest_interval = minutes_or("INGEST_INTERVAL_MINUTES", 10)?;
        let cleanup_interval = minutes_or("CLEANUP_INTERVAL_MINUTES", 60)?;
        let enable_scheduler = env_or("ENABLE_SCHEDULER", true)?;

        if news_ttl_hours <= 0 {
            return Err("NEWS_TTL_HOURS must be positive".into());
        }
        if chrono::Duration::try_hours(news_ttl_hours).is_none() {
            return Err("NEWS_TTL_HOURS is too large".into());
        }
        if recency_window_minutes <= 0 {
            return Err("RECENCY_WINDOW_MINUTES must be positive".into());
        }
        if chrono::Duration::try_minutes(recency_window_minutes).is_none() {
            return Err("RECENCY_WINDOW_MINUTES is too large".into());
        }
        if ingest_interval.is_zero() || cleanup_interval.is_zero() {
            return Err("Job intervals must be at least one minute".into());
        }

        Ok(Config {
            database_url,
            server_host,
            server_port,
            neynar_api_key,
            neynar_api_url,
            dexscreener_api_url,
            cron_secret,
            ticker_ttl,
            news_ttl_hours,
            cast_fetch_limit,
            recency_window_minutes,
            ingest_budget,
            ingest_interval,
            cleanup_interval,
            enable_scheduler,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or<T>(key: &str, default: T) -> Result<T, Box<dyn std::error::Error>>
    where T: FromStr, T::Err: std::error::Error + 'static
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| format!("{} is invalid: {}", key, e).into()),
        Err(_) => Ok(default),
    }
}

/// A whole-minute interval read from `key`.
fn minutes_or(key: &str, default: u64) -> Result<Duration, Box<dyn std::error::Error>> {
    let minutes = env_or(key, default)?;
    let secs = minutes.checked_mul(60).ok_or_else(|| format!("{} is too large", key))?;
    Ok(Duration::from_secs(secs))
}
