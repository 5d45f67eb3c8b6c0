//! Billing endpoints: query, detail, creation, payment, reminders.

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::types::Pagination;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BillInfo {
    pub bill_id: i64,
    pub meter_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_no: Option<String>,
    pub bill_month: String,
    #[serde(default)]
    pub total_usage: f64,
    #[serde(default)]
    pub bill_amount: f64,
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_time: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BillQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bill_month: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillPage {
    #[serde(default)]
    pub bills: Vec<BillInfo>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct PayBillParams {
    pub bill_id: i64,
    pub payment_amount: f64,
    pub payment_method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
}

pub async fn query(gateway: &Gateway, params: &BillQuery) -> Result<BillPage, ApiError> {
    gateway.get_query("/bill/query", params).await
}

pub async fn detail(gateway: &Gateway, bill_id: i64) -> Result<BillInfo, ApiError> {
    gateway.get(&format!("/bill/detail/{bill_id}")).await
}

pub async fn create(gateway: &Gateway, bill_month: &str, meter_id: i64) -> Result<BillInfo, ApiError> {
    gateway
        .post(
            "/bill/create",
            &serde_json::json!({ "bill_month": bill_month, "meter_id": meter_id }),
        )
        .await
}

pub async fn pay(gateway: &Gateway, params: &PayBillParams) -> Result<BillInfo, ApiError> {
    gateway.post("/bill/pay", params).await
}

pub async fn send_reminder(gateway: &Gateway, bill_id: i64) -> Result<Value, ApiError> {
    gateway
        .post(&format!("/bill/reminder/{bill_id}"), &Value::Null)
        .await
}

/// Generate one month's bills for every meter in a region.
pub async fn batch_create(
    gateway: &Gateway,
    bill_month: &str,
    region_id: i64,
) -> Result<Value, ApiError> {
    gateway
        .post(
            "/bill/batch-create",
            &serde_json::json!({ "bill_month": bill_month, "region_id": region_id }),
        )
        .await
}
