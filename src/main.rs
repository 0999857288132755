use base_pulse::{ AppError, Config, Result };
use base_pulse::clients::{ DexScreenerClient, NeynarClient, RssFeedReader };
use base_pulse::clock::{ Clock, SystemClock };
use base_pulse::db::{ NewsRepository, SourceRepository, TickerRepository };
use base_pulse::scheduler::Scheduler;
use base_pulse::services::{
    IngestionSettings,
    NewsIngestionJob,
    NewsService,
    RetentionSweepJob,
    TickerCache,
};
use migration::MigratorTrait;
use std::sync::Arc;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "base_pulse=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    if config.neynar_api_key.is_none() {
        tracing::warn!("NEYNAR_API_KEY is not set; Farcaster ingestion will fail per source");
    }

    // Initialize database connection
    let db = sea_orm::Database::connect(&config.database_url).await.map_err(AppError::Database)?;

    tracing::info!("Database connected successfully");

    // Run migrations
    migration::Migrator::up(&db, None).await.map_err(AppError::Database)?;

    tracing::info!("Migrations completed successfully");

    // Repositories
    let sources = SourceRepository::new(db.clone());
    let news = NewsRepository::new(db.clone());
    let ticker_repository = TickerRepository::new(db);

    if ticker_repository.ensure_placeholder().await? {
        tracing::info!("Ticker row initialized");
    }

    // Upstream clients
    let market = Arc::new(DexScreenerClient::new(config.dexscreener_api_url.clone())?);
    let casts = Arc::new(NeynarClient::new(config.neynar_api_url.clone(), config.neynar_api_key.clone())?);
    let feeds = Arc::new(RssFeedReader::new()?);

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // Services and jobs
    let ticker_cache = Arc::new(
        TickerCache::new(Arc::new(ticker_repository), market, clock.clone(), config.ticker_ttl)
    );

    let news_service = Arc::new(NewsService::new(news.clone(), clock.clone()));

    let ingestion_job = Arc::new(
        NewsIngestionJob::new(
            sources,
            news.clone(),
            ticker_cache.clone(),
            casts,
            feeds,
            clock.clone(),
            IngestionSettings::from_config(&config)
        )
    );

    let retention_job = Arc::new(RetentionSweepJob::new(news, clock));

    if config.enable_scheduler {
        Scheduler::new(
            ingestion_job.clone(),
            retention_job.clone(),
            config.ingest_interval,
            config.cleanup_interval
        ).start();
    } else {
        tracing::info!("In-process scheduler disabled; jobs run only via the cron routes");
    }

    // Create app state
    let app_state = base_pulse::api::AppState::new(
        news_service,
        ticker_cache,
        ingestion_job,
        retention_job,
        config.cron_secret.clone()
    );

    let app = base_pulse::api::router(app_state);

    // Start server
    let addr = config.server_addr();
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
