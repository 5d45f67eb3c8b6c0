//! System administration endpoints: price policies, regions, user role
//! changes, and operation logs. Super-admin surface.

use crate::error::ApiError;
use crate::gateway::Gateway;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct PricePolicyParams {
    pub policy_name: String,
    pub base_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peak_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valley_price: Option<f64>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionParams {
    pub region_name: String,
    pub region_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemLogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

pub async fn price_policies(gateway: &Gateway) -> Result<Value, ApiError> {
    gateway.get("/system/price-policy/list").await
}

pub async fn create_price_policy(
    gateway: &Gateway,
    params: &PricePolicyParams,
) -> Result<Value, ApiError> {
    gateway.post("/system/price-policy/create", params).await
}

/// The update endpoint takes the policy id inline with the policy fields.
pub async fn update_price_policy(
    gateway: &Gateway,
    policy_id: i64,
    params: &PricePolicyParams,
) -> Result<Value, ApiError> {
    let mut body = serde_json::to_value(params)
        .map_err(|err| ApiError::InvalidResponse(format!("failed to encode request: {err}")))?;
    if let Value::Object(map) = &mut body {
        map.insert("policy_id".into(), policy_id.into());
    }
    gateway.put("/system/price-policy/update", &body).await
}

pub async fn delete_price_policy(gateway: &Gateway, policy_id: i64) -> Result<Value, ApiError> {
    gateway.delete(&format!("/system/price-policy/{policy_id}")).await
}

pub async fn regions(gateway: &Gateway) -> Result<Value, ApiError> {
    gateway.get("/system/region/list").await
}

pub async fn create_region(gateway: &Gateway, params: &RegionParams) -> Result<Value, ApiError> {
    gateway.post("/system/region/create", params).await
}

pub async fn update_region(
    gateway: &Gateway,
    region_id: i64,
    params: &RegionParams,
) -> Result<Value, ApiError> {
    gateway.put(&format!("/system/region/{region_id}"), params).await
}

pub async fn delete_region(gateway: &Gateway, region_id: i64) -> Result<Value, ApiError> {
    gateway.delete(&format!("/system/region/{region_id}")).await
}

pub async fn update_user_role(
    gateway: &Gateway,
    user_id: i64,
    new_role: &str,
) -> Result<Value, ApiError> {
    gateway
        .put(
            "/system/user/update-role",
            &serde_json::json!({ "user_id": user_id, "new_role": new_role }),
        )
        .await
}

pub async fn logs(gateway: &Gateway, query: &SystemLogQuery) -> Result<Value, ApiError> {
    gateway.get_query("/system/logs", query).await
}
