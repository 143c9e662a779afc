// src/types/salary.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub id: i64,
    pub company_id: i64,
    pub job_title: String,
    pub level: Option<String>,
    pub base_salary: f64,
    pub bonus: Option<f64>,
    pub equity: Option<f64>,
    pub total_compensation: f64,
    pub currency: String,
    pub location: Option<String>,
    pub years_experience: Option<i64>,
    pub data_source: Option<String>,
    pub last_updated: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewSalaryRecord {
    pub company_id: i64,
    pub job_title: String,
    pub level: Option<String>,
    pub base_salary: f64,
    pub bonus: Option<f64>,
    pub equity: Option<f64>,
    pub total_compensation: f64,
    pub currency: String,
    pub location: Option<String>,
    pub years_experience: Option<i64>,
    pub data_source: Option<String>,
    pub last_updated: Option<NaiveDate>,
}

/// Total-compensation distribution for one role/level
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub average: f64,
    pub p25: f64,
    pub p75: f64,
}

/// Aggregates for one (job title, level) group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTrend {
    pub job_title: String,
    pub level: String,
    pub avg_base_salary: f64,
    pub min_base_salary: f64,
    pub max_base_salary: f64,
    pub avg_total_compensation: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallSalaryStats {
    pub avg_base_salary: f64,
    pub avg_total_compensation: f64,
    pub median_base_salary: f64,
    pub highest_paying_role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInsights {
    pub trends: Vec<SalaryTrend>,
    pub job_titles: Vec<String>,
    pub levels: Vec<String>,
    pub overall_stats: OverallSalaryStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalaryRange {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryCompareFilter {
    pub job_title: Option<String>,
    pub level: Option<String>,
    pub company_ids: Option<Vec<i64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTrendFilter {
    pub job_title: Option<String>,
    pub level: Option<String>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}
