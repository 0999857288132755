use std::sync::Arc;

use axum::{ middleware, routing::{ get, post }, Router };
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{ cors::CorsLayer, trace::TraceLayer };

pub mod news;
pub mod ticker;
pub mod cron;

use crate::services::{ NewsIngestionJob, NewsService, RetentionSweepJob, TickerCache };

#[derive(Clone)]
pub struct AppState {
    pub news_service: Arc<NewsService>,
    pub ticker_cache: Arc<TickerCache>,
    pub ingestion_job: Arc<NewsIngestionJob>,
    pub retention_job: Arc<RetentionSweepJob>,
    /// When set, the cron routes require `Authorization: Bearer <secret>`.
    pub cron_secret: Option<String>,
}

impl AppState {
    pub fn new(
        news_service: Arc<NewsService>,
        ticker_cache: Arc<TickerCache>,
        ingestion_job: Arc<NewsIngestionJob>,
        retention_job: Arc<RetentionSweepJob>,
        cron_secret: Option<String>
    ) -> Self {
        Self {
            news_service,
            ticker_cache,
            ingestion_job,
            retention_job,
            cron_secret,
        }
    }
}

/// Success envelope: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

pub fn router(state: AppState) -> Router {
    let cron_routes = Router::new()
        .route("/api/cron/fetch-data", get(cron::fetch_data))
        .route("/api/cron/cleanup", get(cron::cleanup))
        .route_layer(middleware::from_fn_with_state(state.clone(), cron::require_cron_secret));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/news", get(news::list_news))
        .route("/api/news/{id}", get(news::get_news))
        .route("/api/news/{id}/like", post(news::like_news))
        .route("/api/highlights", get(news::highlights))
        .route("/api/ticker", get(ticker::get_ticker))
        .merge(cron_routes)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()))
}

async fn health_check() -> &'static str {
    "OK"
}
