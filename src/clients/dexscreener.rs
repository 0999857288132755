use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::{ AppError, Result };
use crate::providers::{ MarketData, TokenQuote };

const REQUEST_TIMEOUT_SECS: u64 = 10;
const MAX_RETRIES: u32 = 3;
const RETRY_BASE: Duration = Duration::from_secs(1);

/// DexScreener token lookups. No caching here; the ticker cache sits in front.
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
    retry_base: Duration,
}

#[derive(Deserialize)]
struct TokensResponse {
    #[serde(default)]
    pairs: Option<Vec<Pair>>,
}

#[derive(Deserialize)]
struct Pair {
    #[serde(rename = "baseToken")]
    base_token: Option<BaseToken>,
    #[serde(rename = "priceUsd")]
    price_usd: Option<String>,
    #[serde(rename = "priceChange")]
    price_change: Option<PriceChange>,
}

#[derive(Deserialize)]
struct BaseToken {
    symbol: Option<String>,
}

#[derive(Deserialize)]
struct PriceChange {
    h24: Option<f64>,
}

impl Pair {
    fn into_quote(self) -> TokenQuote {
        TokenQuote {
            symbol: self.base_token
                .and_then(|t| t.symbol)
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            price: self.price_usd.and_then(|p| p.parse::<f64>().ok()),
            change_24h: self.price_change.and_then(|c| c.h24),
        }
    }
}

impl DexScreenerClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client
            ::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base: RETRY_BASE,
        })
    }

    /// Backoff after the n-th rate-limited attempt is `base * 2^n`.
    pub fn with_retry_base(mut self, base: Duration) -> Self {
        self.retry_base = base;
        self
    }

    /// Fetch a URL with retry on 429 rate-limit responses
    async fn fetch_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut last_err = None;
        for attempt in 0..MAX_RETRIES {
            let response = self.client
                .get(url)
                .send().await
                .map_err(|e| AppError::External(format!("DexScreener request failed: {}", e)))?;

            if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                last_err = Some(AppError::External("DexScreener rate limited".to_string()));
                if attempt + 1 == MAX_RETRIES {
                    break;
                }

                let wait = self.retry_base * 2u32.pow(attempt + 1);
                tracing::debug!(attempt, wait_ms = wait.as_millis() as u64, "DexScreener rate limited");
                tokio::time::sleep(wait).await;
                continue;
            }

            if !response.status().is_success() {
                return Err(
                    AppError::External(format!("DexScreener returned status: {}", response.status()))
                );
            }

            return Ok(response);
        }
        Err(
            last_err.unwrap_or_else(||
                AppError::External("DexScreener request failed after retries".to_string())
            )
        )
    }
}

#[async_trait]
impl MarketData for DexScreenerClient {
    async fn fetch_price(&self, token_address: &str) -> Result<Option<TokenQuote>> {
        let url = format!("{}/tokens/{}", self.base_url, token_address);

        let response = self.fetch_with_retry(&url).await?;

        let body: TokensResponse = response
            .json().await
            .map_err(|e| AppError::External(format!("Failed to parse DexScreener response: {}", e)))?;

        Ok(body.pairs.unwrap_or_default().into_iter().next().map(Pair::into_quote))
    }
}
