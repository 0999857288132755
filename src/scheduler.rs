use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{ interval, Duration, MissedTickBehavior };

use crate::services::{ NewsIngestionJob, RetentionSweepJob };

/// In-process timer driving the two background jobs.
pub struct Scheduler {
    ingestion_job: Arc<NewsIngestionJob>,
    retention_job: Arc<RetentionSweepJob>,
    ingest_every: Duration,
    cleanup_every: Duration,
}

impl Scheduler {
    pub fn new(
        ingestion_job: Arc<NewsIngestionJob>,
        retention_job: Arc<RetentionSweepJob>,
        ingest_every: Duration,
        cleanup_every: Duration
    ) -> Self {
        Self {
            ingestion_job,
            retention_job,
            ingest_every,
            cleanup_every,
        }
    }

    /// Spawn both loops. Each job runs once immediately, then on its interval.
    pub fn start(self) -> Vec<JoinHandle<()>> {
        tracing::info!(
            ingest_every_secs = self.ingest_every.as_secs(),
            cleanup_every_secs = self.cleanup_every.as_secs(),
            "scheduler started"
        );

        let ingestion = {
            let job = self.ingestion_job;
            let every = self.ingest_every;
            tokio::spawn(async move {
                let mut ticker = interval(every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    ticker.tick().await;
                    let summary = job.run().await;
                    if !summary.success {
                        tracing::error!(errors = ?summary.errors, "scheduled ingestion failed");
                    }
                }
            })
        };

        let retention = {
            let job = self.retention_job;
            let every = self.cleanup_every;
            tokio::spawn(async move {
                let mut ticker = interval(every);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

                loop {
                    ticker.tick().await;
                    if let Err(e) = job.run().await {
                        tracing::error!(error = %e, "scheduled retention sweep failed");
                    }
                }
            })
        };

        vec![ingestion, retention]
    }
}
