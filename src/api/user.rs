//! User account endpoints: registration, login/logout, profile,
//! password management, meter binding, and the admin user list.

use crate::error::ApiError;
use crate::gateway::Gateway;
use crate::types::{LoginCredentials, LoginData, Pagination, UserProfile};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::meter::MeterInfo;

#[derive(Debug, Clone, Serialize)]
pub struct RegisterParams {
    pub mail: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idcard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateUserParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idcard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangePasswordParams {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserPage {
    #[serde(default)]
    pub users: Vec<UserProfile>,
    #[serde(default)]
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserMeters {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub meters: Vec<MeterInfo>,
}

pub async fn register(gateway: &Gateway, params: &RegisterParams) -> Result<UserProfile, ApiError> {
    gateway.post("/user/register", params).await
}

pub async fn login(gateway: &Gateway, credentials: &LoginCredentials) -> Result<LoginData, ApiError> {
    gateway.post("/user/login", credentials).await
}

pub async fn logout(gateway: &Gateway) -> Result<Value, ApiError> {
    gateway.post("/user/logout", &Value::Null).await
}

pub async fn get_info(gateway: &Gateway) -> Result<UserProfile, ApiError> {
    gateway.get("/user/info").await
}

pub async fn update(gateway: &Gateway, params: &UpdateUserParams) -> Result<UserProfile, ApiError> {
    gateway.put("/user/update", params).await
}

pub async fn change_password(
    gateway: &Gateway,
    params: &ChangePasswordParams,
) -> Result<Value, ApiError> {
    gateway.post("/user/change-password", params).await
}

pub async fn send_reset_code(gateway: &Gateway, mail: &str) -> Result<Value, ApiError> {
    gateway
        .post("/user/send-reset-code", &serde_json::json!({ "mail": mail }))
        .await
}

pub async fn reset_password(
    gateway: &Gateway,
    mail: &str,
    code: &str,
    new_password: &str,
) -> Result<Value, ApiError> {
    gateway
        .post(
            "/user/reset-password",
            &serde_json::json!({ "mail": mail, "code": code, "new_password": new_password }),
        )
        .await
}

pub async fn list(gateway: &Gateway, query: &UserListQuery) -> Result<UserPage, ApiError> {
    gateway.get_query("/user/list", query).await
}

pub async fn meters(gateway: &Gateway) -> Result<UserMeters, ApiError> {
    gateway.get("/user/meters").await
}

pub async fn bind_meter(
    gateway: &Gateway,
    meter_code: &str,
    target_user_id: Option<i64>,
) -> Result<Value, ApiError> {
    gateway
        .post(
            "/user/bind-meter",
            &serde_json::json!({ "meter_code": meter_code, "target_user_id": target_user_id }),
        )
        .await
}

pub async fn unbind_meter(
    gateway: &Gateway,
    meter_id: i64,
    target_user_id: Option<i64>,
) -> Result<Value, ApiError> {
    gateway
        .post(
            "/user/unbind-meter",
            &serde_json::json!({ "meter_id": meter_id, "target_user_id": target_user_id }),
        )
        .await
}
