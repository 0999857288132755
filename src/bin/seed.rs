use anyhow::Context;
use base_pulse::clients::NeynarClient;
use base_pulse::db::{ SourceRepository, TickerRepository };
use base_pulse::seed::{ seed, SEED_SOURCES };
use base_pulse::Config;
use migration::MigratorTrait;
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "base_pulse=info".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let db = sea_orm::Database::connect(&config.database_url).await.context("connecting to database")?;
    migration::Migrator::up(&db, None).await.context("running migrations")?;

    let casts = NeynarClient::new(config.neynar_api_url.clone(), config.neynar_api_key.clone())?;

    let report = seed(
        &SourceRepository::new(db.clone()),
        &TickerRepository::new(db),
        &casts,
        SEED_SOURCES
    ).await?;

    tracing::info!(sources = report.sources, fids = report.fids_resolved, "seeding complete");
    Ok(())
}
