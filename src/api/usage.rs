//! Electricity usage endpoints: readings upload, aggregation, queries.

use crate::error::ApiError;
use crate::gateway::Gateway;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct UploadParams {
    pub meter_id: i64,
    pub electricity: f64,
    pub collect_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voltage: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UsageInfo {
    pub usage_id: i64,
    pub meter_id: i64,
    #[serde(default)]
    pub electricity: f64,
    #[serde(default)]
    pub collect_time: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meter_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

pub async fn iot_upload(gateway: &Gateway, params: &UploadParams) -> Result<UsageInfo, ApiError> {
    gateway.post("/usage/iot-upload", params).await
}

pub async fn manual_input(gateway: &Gateway, params: &UploadParams) -> Result<UsageInfo, ApiError> {
    gateway.post("/usage/manual-input", params).await
}

/// `usage_type` is `DAY` or `MONTH`.
pub async fn aggregate(
    gateway: &Gateway,
    meter_id: i64,
    usage_type: &str,
    target_date: Option<&str>,
) -> Result<Value, ApiError> {
    gateway
        .post(
            "/usage/aggregate",
            &serde_json::json!({
                "meter_id": meter_id,
                "usage_type": usage_type,
                "target_date": target_date,
            }),
        )
        .await
}

pub async fn query(gateway: &Gateway, params: &UsageQuery) -> Result<Value, ApiError> {
    gateway.get_query("/usage/query", params).await
}
