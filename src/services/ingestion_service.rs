use std::sync::Arc;

use chrono::{ DateTime, Duration, Utc };
use serde::Serialize;

use crate::clock::Clock;
use crate::config::Config;
use crate::db::entity::source;
use crate::db::{ NewNewsItem, NewsRepository, SourceRepository };
use crate::enums::SourceKind;
use crate::error::Result;
use crate::providers::{ CastFeed, FeedReader };
use crate::services::ticker_service::TickerCache;

const MAX_TITLE_CHARS: usize = 200;
const SKIPPED_MESSAGE: &str = "Skipped: ingestion budget exhausted";

#[derive(Debug, Clone)]
pub struct IngestionSettings {
    pub cast_fetch_limit: u32,
    /// Casts and feed items older than this are ignored.
    pub recency_window: Duration,
    pub news_ttl: Duration,
    /// Wall-clock budget for a whole run, ticker refresh included.
    pub budget: std::time::Duration,
}

impl Default for IngestionSettings {
    fn default() -> Self {
        Self {
            cast_fetch_limit: 5,
            recency_window: Duration::hours(1),
            news_ttl: Duration::hours(48),
            budget: std::time::Duration::from_secs(50),
        }
    }
}

impl IngestionSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            cast_fetch_limit: config.cast_fetch_limit,
            recency_window: Duration::minutes(config.recency_window_minutes),
            news_ttl: Duration::hours(config.news_ttl_hours),
            budget: config.ingest_budget,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    pub message: String,
}

impl StepOutcome {
    fn pending(counted: bool) -> Self {
        Self {
            success: false,
            count: counted.then_some(0),
            message: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionResults {
    pub ticker: StepOutcome,
    pub casts: StepOutcome,
    pub rss: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestionSummary {
    /// False only when the run had to abort (storage failure).
    pub success: bool,
    pub results: IngestionResults,
    pub errors: Vec<String>,
    /// The wall-clock budget ran out before every source was polled.
    pub truncated: bool,
    pub timestamp: DateTime<Utc>,
}

impl IngestionSummary {
    pub fn inserted(&self) -> u64 {
        self.results.casts.count.unwrap_or(0) + self.results.rss.count.unwrap_or(0)
    }
}

/// `text` capped at 200 characters, with `...` appended when cut.
pub fn truncate_title(text: &str) -> String {
    if text.chars().count() > MAX_TITLE_CHARS {
        let mut title: String = text.chars().take(MAX_TITLE_CHARS).collect();
        title.push_str("...");
        title
    } else {
        text.to_string()
    }
}

/// Pulls recent casts and feed items for every source and refreshes the ticker.
pub struct NewsIngestionJob {
    sources: SourceRepository,
    news: NewsRepository,
    ticker: Arc<TickerCache>,
    casts: Arc<dyn CastFeed>,
    feeds: Arc<dyn FeedReader>,
    clock: Arc<dyn Clock>,
    settings: IngestionSettings,
}

impl NewsIngestionJob {
    pub fn new(
        sources: SourceRepository,
        news: NewsRepository,
        ticker: Arc<TickerCache>,
        casts: Arc<dyn CastFeed>,
        feeds: Arc<dyn FeedReader>,
        clock: Arc<dyn Clock>,
        settings: IngestionSettings
    ) -> Self {
        Self {
            sources,
            news,
            ticker,
            casts,
            feeds,
            clock,
            settings,
        }
    }

    pub async fn run(&self) -> IngestionSummary {
        tracing::info!("ingestion run started");

        let mut results = IngestionResults {
            ticker: StepOutcome::pending(false),
            casts: StepOutcome::pending(true),
            rss: StepOutcome::pending(true),
        };
        let mut errors = Vec::new();
        let mut truncated = false;

        let deadline = tokio::time::Instant::now() + self.settings.budget;

        match tokio::time::timeout_at(deadline, self.ticker.refresh()).await {
            Ok(Ok(_)) => {
                results.ticker.success = true;
                results.ticker.message = "Ticker updated".to_string();
            }
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "ticker step failed");
                results.ticker.message = e.to_string();
                errors.push(format!("ticker: {}", e));
            }
            Err(_) => {
                tracing::warn!("ingestion budget exhausted during ticker refresh");
                results.ticker.message = "Ticker refresh exceeded ingestion budget".to_string();
                errors.push("ticker: ingestion budget exhausted".to_string());
                truncated = true;
            }
        }

        let started = self.clock.now();
        let cutoff = started - self.settings.recency_window;

        // Farcaster
        let mut cast_count = 0u64;
        let casts_skipped = truncated;
        if !casts_skipped {
            let fid_sources = match self.sources.find_with_fid().await {
                Ok(sources) => sources,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load sources");
                    results.casts.message = "Failed to load sources".to_string();
                    errors.push(format!("sources: {}", e));
                    return self.finish(false, results, errors, truncated);
                }
            };

            for source in &fid_sources {
                let Some(fid) = source.farcaster_fid.as_deref() else {
                    continue;
                };

                let step = self.ingest_casts(source, fid, cutoff, &mut cast_count);
                match tokio::time::timeout_at(deadline, step).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!(source = %source.name, fid, error = %e, "cast ingestion failed");
                        errors.push(format!("{}: {}", source.name, e));
                    }
                    Err(_) => {
                        tracing::warn!(source = %source.name, "ingestion budget exhausted");
                        truncated = true;
                        break;
                    }
                }
            }
        }

        results.casts.count = Some(cast_count);
        if casts_skipped {
            results.casts.message = SKIPPED_MESSAGE.to_string();
        } else {
            results.casts.success = true;
            results.casts.message = format!("Added {} new casts", cast_count);
        }

        // RSS
        let mut rss_count = 0u64;
        let rss_skipped = truncated;
        if !rss_skipped {
            let rss_sources = match self.sources.find_with_rss().await {
                Ok(sources) => sources,
                Err(e) => {
                    tracing::error!(error = %e, "failed to load feed sources");
                    results.rss.message = "Failed to load sources".to_string();
                    errors.push(format!("sources: {}", e));
                    return self.finish(false, results, errors, truncated);
                }
            };

            for source in &rss_sources {
                let Some(url) = source.rss_url.as_deref() else {
                    continue;
                };

                let step = self.ingest_feed(source, url, cutoff, &mut rss_count);
                match tokio::time::timeout_at(deadline, step).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        tracing::warn!(source = %source.name, feed = %url, error = %e, "feed ingestion failed");
                        errors.push(format!("{}: {}", source.name, e));
                    }
                    Err(_) => {
                        tracing::warn!(source = %source.name, "ingestion budget exhausted");
                        truncated = true;
                        break;
                    }
                }
            }
        }

        results.rss.count = Some(rss_count);
        if rss_skipped {
            results.rss.message = SKIPPED_MESSAGE.to_string();
        } else {
            results.rss.success = true;
            results.rss.message = format!("Added {} new feed items", rss_count);
        }

        self.finish(true, results, errors, truncated)
    }

    fn finish(
        &self,
        success: bool,
        results: IngestionResults,
        errors: Vec<String>,
        truncated: bool
    ) -> IngestionSummary {
        let summary = IngestionSummary {
            success,
            results,
            errors,
            truncated,
            timestamp: self.clock.now(),
        };

        tracing::info!(
            success,
            inserted = summary.inserted(),
            errors = summary.errors.len(),
            truncated,
            "ingestion run finished"
        );
        summary
    }

    async fn ingest_casts(
        &self,
        source: &source::Model,
        fid: &str,
        cutoff: DateTime<Utc>,
        inserted: &mut u64
    ) -> Result<()> {
        let casts = self.casts.fetch_casts(fid, self.settings.cast_fetch_limit).await?;

        for cast in casts {
            if cast.timestamp < cutoff {
                continue;
            }

            let created_at = self.clock.now();
            let item = NewNewsItem {
                source_id: source.id,
                title: truncate_title(&cast.text),
                image_url: cast.image_url(),
                original_link: cast.canonical_link(),
                content: Some(cast.text),
                source_kind: SourceKind::Farcaster,
                created_at,
                expires_at: created_at + self.settings.news_ttl,
            };

            if self.news.insert_if_absent(item).await? {
                *inserted += 1;
            }
        }

        Ok(())
    }

    async fn ingest_feed(
        &self,
        source: &source::Model,
        url: &str,
        cutoff: DateTime<Utc>,
        inserted: &mut u64
    ) -> Result<()> {
        for entry in self.feeds.parse(url).await {
            if entry.published_at < cutoff {
                continue;
            }
            let Some(link) = entry.link else {
                continue;
            };

            let created_at = self.clock.now();
            let item = NewNewsItem {
                source_id: source.id,
                title: truncate_title(&entry.title),
                content: Some(entry.content).filter(|c| !c.is_empty()),
                image_url: entry.image_url,
                original_link: link,
                source_kind: SourceKind::Rss,
                created_at,
                expires_at: created_at + self.settings.news_ttl,
            };

            if self.news.insert_if_absent(item).await? {
                *inserted += 1;
            }
        }

        Ok(())
    }
}
