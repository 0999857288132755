use std::sync::Arc;

use chrono::{ DateTime, Utc };
use serde::Serialize;

use crate::clock::Clock;
use crate::db::NewsRepository;
use crate::error::Result;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SweepSummary {
    pub deleted_count: u64,
    pub timestamp: DateTime<Utc>,
}

/// Deletes news items past their expiry.
pub struct RetentionSweepJob {
    news: NewsRepository,
    clock: Arc<dyn Clock>,
}

impl RetentionSweepJob {
    pub fn new(news: NewsRepository, clock: Arc<dyn Clock>) -> Self {
        Self { news, clock }
    }

    pub async fn run(&self) -> Result<SweepSummary> {
        let now = self.clock.now();
        let deleted_count = self.news.delete_expired(now).await?;

        tracing::info!(deleted_count, "retention sweep finished");

        Ok(SweepSummary {
            deleted_count,
            timestamp: now,
        })
    }
}
