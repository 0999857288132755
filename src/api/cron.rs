use axum::{
    extract::{ Request, State },
    http::{ header::AUTHORIZATION, HeaderMap, StatusCode },
    middleware::Next,
    response::{ IntoResponse, Response },
    Json,
};
use serde::Serialize;

use crate::error::{ AppError, ErrorDetail, Result };
use crate::services::{ IngestionSummary, SweepSummary };

use super::AppState;

/// True when no secret is configured, or the header is exactly `Bearer <secret>`.
pub fn is_authorized(secret: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(secret) = secret else {
        return true;
    };

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|token| token == secret)
}

pub async fn require_cron_secret(
    State(state): State<AppState>,
    request: Request,
    next: Next
) -> Result<Response> {
    if !is_authorized(state.cron_secret.as_deref(), request.headers()) {
        tracing::warn!(path = %request.uri().path(), "rejected cron trigger");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

/// Body of a 500 from fetch-data: the partial summary plus the usual error object.
#[derive(Debug, Serialize)]
pub struct FetchDataFailure {
    #[serde(flatten)]
    pub summary: IngestionSummary,
    pub error: ErrorDetail,
}

impl From<IngestionSummary> for FetchDataFailure {
    fn from(summary: IngestionSummary) -> Self {
        let message = match summary.errors.last() {
            Some(last) => format!("Ingestion aborted: {}", last),
            None => "Ingestion aborted".to_string(),
        };

        Self {
            summary,
            error: ErrorDetail {
                code: "INGESTION_FAILED".to_string(),
                message,
            },
        }
    }
}

pub async fn fetch_data(State(state): State<AppState>) -> Response {
    let summary = state.ingestion_job.run().await;

    if summary.success {
        (StatusCode::OK, Json(summary)).into_response()
    } else {
        tracing::error!(errors = ?summary.errors, "ingestion run aborted");
        (StatusCode::INTERNAL_SERVER_ERROR, Json(FetchDataFailure::from(summary))).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub success: bool,
    #[serde(flatten)]
    pub summary: SweepSummary,
}

pub async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>> {
    let summary = state.retention_job.run().await?;

    Ok(Json(CleanupResponse { success: true, summary }))
}
