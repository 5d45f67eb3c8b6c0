//! Notification endpoints: creation, delivery, queries, read-state.

use crate::error::ApiError;
use crate::gateway::Gateway;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct CreateNotificationParams {
    pub notice_type: String,
    pub target_type: String,
    pub target_ids: Vec<i64>,
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_batch: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotificationInfo {
    pub notification_id: i64,
    #[serde(default)]
    pub notice_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_unread_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

pub async fn create(
    gateway: &Gateway,
    params: &CreateNotificationParams,
) -> Result<NotificationInfo, ApiError> {
    gateway.post("/notification/create", params).await
}

pub async fn send(gateway: &Gateway, notification_id: i64) -> Result<Value, ApiError> {
    gateway
        .post(
            "/notification/send",
            &serde_json::json!({ "notification_id": notification_id }),
        )
        .await
}

pub async fn query(gateway: &Gateway, params: &NotificationQuery) -> Result<Value, ApiError> {
    gateway.get_query("/notification/query", params).await
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatisticsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

pub async fn statistics(gateway: &Gateway, params: &StatisticsQuery) -> Result<Value, ApiError> {
    gateway.get_query("/notification/statistics", params).await
}

/// `action` is `read`, `unread`, or `delete`.
pub async fn update_status(
    gateway: &Gateway,
    notification_id: i64,
    action: &str,
) -> Result<Value, ApiError> {
    gateway
        .put(
            "/notification/update-status",
            &serde_json::json!({ "notification_id": notification_id, "action": action }),
        )
        .await
}
