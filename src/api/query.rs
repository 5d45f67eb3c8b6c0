//! Analysis and reporting endpoints: usage analysis per user or region,
//! rankings, statistics summaries, and data export.

use crate::error::ApiError;
use crate::gateway::Gateway;
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserAnalysisQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    /// `day`, `month`, or `year`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_period: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionAnalysisQuery {
    pub region_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis_period: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_period: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RankingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ranking_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportQuery {
    pub export_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Export response payload. Older backend builds name the file
/// `filename`, newer ones `file_name`; [`ExportData::name`] reads either.
#[derive(Debug, Clone, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub export_time: Option<String>,
}

impl ExportData {
    pub fn name(&self) -> Option<&str> {
        self.file_name.as_deref().or(self.filename.as_deref())
    }
}

pub async fn analyze_user(gateway: &Gateway, params: &UserAnalysisQuery) -> Result<Value, ApiError> {
    gateway.get_query("/query/analyze/user", params).await
}

pub async fn analyze_region(
    gateway: &Gateway,
    params: &RegionAnalysisQuery,
) -> Result<Value, ApiError> {
    gateway.get_query("/query/analyze/region", params).await
}

pub async fn ranking(gateway: &Gateway, params: &RankingQuery) -> Result<Value, ApiError> {
    gateway.get_query("/query/ranking", params).await
}

pub async fn statistics_summary(gateway: &Gateway, params: &SummaryQuery) -> Result<Value, ApiError> {
    gateway.get_query("/query/statistics/summary", params).await
}

pub async fn export(gateway: &Gateway, params: &ExportQuery) -> Result<ExportData, ApiError> {
    gateway.get_query("/query/export", params).await
}
