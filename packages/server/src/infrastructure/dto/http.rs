//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// `GET /page-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStatusDto {
    /// Empty string until the first page change
    pub current_page: String,
    pub connected_client_count: usize,
    pub timestamp_seconds: i64,
}

/// One row of `GET /data`; field names follow the `gaze_data` columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSampleDto {
    pub id: i64,
    pub x: f64,
    pub y: f64,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// `GET /data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSamplesDto {
    pub count: usize,
    pub data: Vec<StoredSampleDto>,
}

/// `GET /data` query string
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RecentSamplesQuery {
    pub limit: Option<usize>,
}

/// `POST /clear`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearResultDto {
    pub message: String,
    pub deleted_gaze_rows: u64,
    pub deleted_page_rows: u64,
}
