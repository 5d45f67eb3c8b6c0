//! Meter endpoints: installation, status, maintenance records, readings.

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::types::Pagination;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MeterInfo {
    pub meter_id: i64,
    pub meter_code: String,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default)]
    pub meter_type: String,
    #[serde(default)]
    pub install_address: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeterPage {
    #[serde(default)]
    pub meters: Vec<MeterInfo>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeterRecord {
    pub record_id: i64,
    pub meter_id: i64,
    #[serde(default)]
    pub record_type: String,
    #[serde(default)]
    pub operator: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeterRecordPage {
    #[serde(default)]
    pub records: Vec<MeterRecord>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallParams {
    pub target_user_id: i64,
    pub region_id: i64,
    pub current_region_id: i64,
    pub install_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddRecordParams {
    pub meter_id: i64,
    pub record_type: String,
    pub operator: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attach_img: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadingValidation {
    pub meter_id: i64,
    #[serde(default)]
    pub old_reading: f64,
    #[serde(default)]
    pub new_reading: f64,
    #[serde(default)]
    pub usage: f64,
}

pub async fn query(gateway: &Gateway) -> Result<MeterPage, ApiError> {
    gateway.get("/meter/query").await
}

pub async fn install(gateway: &Gateway, params: &InstallParams) -> Result<MeterInfo, ApiError> {
    gateway.post("/meter/install", params).await
}

pub async fn update_status(
    gateway: &Gateway,
    meter_id: i64,
    status: &str,
) -> Result<serde_json::Value, ApiError> {
    gateway
        .put(
            "/meter/update-status",
            &serde_json::json!({ "meter_id": meter_id, "status": status }),
        )
        .await
}

pub async fn add_record(gateway: &Gateway, params: &AddRecordParams) -> Result<MeterRecord, ApiError> {
    gateway.post("/meter/add-record", params).await
}

pub async fn records(gateway: &Gateway, meter_id: i64) -> Result<MeterRecordPage, ApiError> {
    gateway.get(&format!("/meter/records/{meter_id}")).await
}

pub async fn validate_reading(
    gateway: &Gateway,
    meter_id: i64,
    new_reading: f64,
    reading_time: &str,
) -> Result<ReadingValidation, ApiError> {
    gateway
        .post(
            "/meter/validate-reading",
            &serde_json::json!({
                "meter_id": meter_id,
                "new_reading": new_reading,
                "reading_time": reading_time,
            }),
        )
        .await
}
