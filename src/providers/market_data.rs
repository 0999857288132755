use async_trait::async_trait;
use chrono::{ DateTime, Utc };
use serde::{ Deserialize, Serialize };

use crate::config::tokens;
use crate::error::{ AppError, Result };

/// Price and 24h change of one token. Either number is `None` when the
/// upstream did not report it; zero is never used as a stand-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenQuote {
    pub symbol: String,
    pub price: Option<f64>,
    #[serde(rename = "change24h")]
    pub change_24h: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopMovers {
    pub gainer: Option<TokenQuote>,
    pub loser: Option<TokenQuote>,
}

/// The cached market record shown in the ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickerSnapshot {
    pub eth: Option<TokenQuote>,
    pub top_gainer: Option<TokenQuote>,
    pub top_loser: Option<TokenQuote>,
    pub updated_at: DateTime<Utc>,
}

impl TickerSnapshot {
    /// Bootstrap row: no data, dated at the epoch so the first read refreshes it.
    pub fn placeholder() -> Self {
        Self {
            eth: None,
            top_gainer: None,
            top_loser: None,
            updated_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }

    pub fn has_data(&self) -> bool {
        self.eth.is_some() || self.top_gainer.is_some() || self.top_loser.is_some()
    }
}

#[async_trait]
pub trait MarketData: Send + Sync {
    /// Quote for a token contract. `Ok(None)` when the token has no trading pair.
    async fn fetch_price(&self, token_address: &str) -> Result<Option<TokenQuote>>;

    /// Best and worst 24h performers among `token_addresses`.
    async fn fetch_top_movers(&self, token_addresses: &[&str]) -> TopMovers {
        let results = futures::future::join_all(
            token_addresses.iter().map(|address| self.fetch_price(address))
        ).await;

        let quotes = results
            .into_iter()
            .zip(token_addresses.iter())
            .filter_map(|(result, address)| {
                match result {
                    Ok(quote) => quote,
                    Err(e) => {
                        tracing::warn!(token = %address, error = %e, "mover candidate unavailable");
                        None
                    }
                }
            })
            .collect();

        select_top_movers(quotes)
    }
}

/// Rank by 24h change, descending. Quotes without a change figure cannot be
/// ranked and are dropped.
pub fn select_top_movers(quotes: Vec<TokenQuote>) -> TopMovers {
    let mut ranked: Vec<TokenQuote> = quotes
        .into_iter()
        .filter(|q| q.change_24h.map(|c| c.is_finite()).unwrap_or(false))
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.change_24h.unwrap_or_default();
        let b = b.change_24h.unwrap_or_default();
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });

    TopMovers {
        gainer: ranked.first().cloned(),
        loser: ranked.last().cloned(),
    }
}

/// Build a fresh snapshot from the market client. Fails only when nothing at
/// all could be fetched, so callers never persist an empty snapshot over a
/// good one.
pub async fn fetch_snapshot(market: &dyn MarketData, now: DateTime<Utc>) -> Result<TickerSnapshot> {
    let (eth, movers) = tokio::join!(
        market.fetch_price(tokens::WETH),
        market.fetch_top_movers(&tokens::MOVER_CANDIDATES)
    );

    let eth = match eth {
        Ok(quote) => quote.map(|q| TokenQuote { symbol: "ETH".to_string(), ..q }),
        Err(e) => {
            tracing::warn!(error = %e, "ETH price unavailable");
            None
        }
    };

    let snapshot = TickerSnapshot {
        eth,
        top_gainer: movers.gainer,
        top_loser: movers.loser,
        updated_at: now,
    };

    if !snapshot.has_data() {
        return Err(AppError::External("Market data unavailable".to_string()));
    }

    Ok(snapshot)
}
