use axum::{ extract::State, Json };
use serde::Serialize;

use crate::error::Result;
use crate::providers::TickerSnapshot;

use super::AppState;

#[derive(Debug, Serialize)]
pub struct TickerResponse {
    pub success: bool,
    pub data: TickerSnapshot,
    /// Present only when the snapshot is served stale after a failed refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cached: Option<bool>,
}

pub async fn get_ticker(State(state): State<AppState>) -> Result<Json<TickerResponse>> {
    let read = state.ticker_cache.get().await?;

    Ok(
        Json(TickerResponse {
            success: true,
            data: read.snapshot,
            cached: read.stale.then_some(true),
        })
    )
}
