use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::clock::Clock;
use crate::error::Result;
use crate::providers::{ fetch_snapshot, MarketData, TickerSnapshot };

/// Durable home of the ticker snapshot.
#[async_trait]
pub trait TickerStore: Send + Sync {
    async fn load(&self) -> Result<Option<TickerSnapshot>>;
    async fn save(&self, snapshot: &TickerSnapshot) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerRead {
    pub snapshot: TickerSnapshot,
    /// Served from the store after a failed refresh.
    pub stale: bool,
}

/// Read-through cache in front of the ticker row.
pub struct TickerCache {
    store: Arc<dyn TickerStore>,
    market: Arc<dyn MarketData>,
    clock: Arc<dyn Clock>,
    ttl: chrono::Duration,
    refresh_lock: Mutex<()>,
}

impl TickerCache {
    pub fn new(
        store: Arc<dyn TickerStore>,
        market: Arc<dyn MarketData>,
        clock: Arc<dyn Clock>,
        ttl: std::time::Duration
    ) -> Self {
        Self {
            store,
            market,
            clock,
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::seconds(60)),
            refresh_lock: Mutex::new(()),
        }
    }

    fn is_fresh(&self, snapshot: &TickerSnapshot) -> bool {
        self.clock.now() - snapshot.updated_at < self.ttl
    }

    /// Cached snapshot if younger than the TTL, otherwise a refreshed one.
    /// Falls back to the stored snapshot when the refresh fails.
    pub async fn get(&self) -> Result<TickerRead> {
        if let Some(snapshot) = self.store.load().await? {
            if self.is_fresh(&snapshot) {
                return Ok(TickerRead { snapshot, stale: false });
            }
        }

        let _guard = self.refresh_lock.lock().await;

        // Another reader may have refreshed while we waited for the lock
        let cached = self.store.load().await?;
        if let Some(snapshot) = &cached {
            if self.is_fresh(snapshot) {
                return Ok(TickerRead { snapshot: snapshot.clone(), stale: false });
            }
        }

        match fetch_snapshot(self.market.as_ref(), self.clock.now()).await {
            Ok(snapshot) => {
                if let Err(e) = self.store.save(&snapshot).await {
                    tracing::warn!(error = %e, "failed to persist refreshed ticker");
                }
                Ok(TickerRead { snapshot, stale: false })
            }
            Err(e) => {
                tracing::warn!(error = %e, "ticker refresh failed");
                match cached {
                    Some(snapshot) => Ok(TickerRead { snapshot, stale: true }),
                    None => Err(e),
                }
            }
        }
    }

    /// Fetch and overwrite regardless of the cached snapshot's age.
    pub async fn refresh(&self) -> Result<TickerSnapshot> {
        let _guard = self.refresh_lock.lock().await;

        let snapshot = fetch_snapshot(self.market.as_ref(), self.clock.now()).await?;
        self.store.save(&snapshot).await?;

        tracing::debug!(has_eth = snapshot.eth.is_some(), "ticker refreshed");
        Ok(snapshot)
    }
}
