//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{
        ClearResultDto, PageStatusDto, RecentSamplesDto, RecentSamplesQuery, StoredSampleDto,
    },
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current page and connected viewer count
pub async fn page_status(State(state): State<Arc<AppState>>) -> Json<PageStatusDto> {
    let status = state.get_page_status_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(PageStatusDto {
        current_page: status
            .page
            .page
            .map(|page| page.into_string())
            .unwrap_or_default(),
        connected_client_count: status.connected_clients,
        timestamp_seconds: status.timestamp_seconds,
    })
}

/// Most recent persisted samples, newest first
pub async fn recent_samples(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RecentSamplesQuery>,
) -> Result<Json<RecentSamplesDto>, StatusCode> {
    match state.get_recent_samples_usecase.execute(query.limit).await {
        Ok(samples) => {
            let data: Vec<StoredSampleDto> =
                samples.into_iter().map(StoredSampleDto::from).collect();
            Ok(Json(RecentSamplesDto {
                count: data.len(),
                data,
            }))
        }
        Err(e) => {
            tracing::error!("Failed to load recent samples: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Delete every persisted sample and page change
pub async fn clear_history(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ClearResultDto>, StatusCode> {
    match state.clear_history_usecase.execute().await {
        Ok(counts) => Ok(Json(ClearResultDto {
            message: "All data cleared".to_string(),
            deleted_gaze_rows: counts.samples,
            deleted_page_rows: counts.page_changes,
        })),
        Err(e) => {
            tracing::error!("Failed to clear data: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
