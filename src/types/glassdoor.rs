// src/types/glassdoor.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Cached interview experience
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRecord {
    pub id: i64,
    pub company_id: i64,
    pub external_id: Option<String>,
    pub job_title: String,
    pub interview_type: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    /// JSON array of question strings
    pub questions: Option<String>,
    pub experience: Option<String>,
    pub outcome: Option<String>,
    pub interview_date: Option<NaiveDate>,
    pub data_source: String,
    pub cached_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewInterview {
    pub company_id: i64,
    pub external_id: Option<String>,
    pub job_title: String,
    pub interview_type: Option<String>,
    pub difficulty: Option<String>,
    pub duration: Option<String>,
    pub questions: Vec<String>,
    pub experience: Option<String>,
    pub outcome: Option<String>,
    pub interview_date: Option<NaiveDate>,
}

/// One cached metrics row per company
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct GlassdoorMetrics {
    pub id: i64,
    pub company_id: i64,
    pub company_name: String,
    pub overall_rating: Option<f64>,
    pub ceo_approval: Option<f64>,
    pub recommend_to_friend: Option<f64>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: String,
    pub review_count: i64,
    pub interview_count: i64,
    pub last_synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewGlassdoorMetrics {
    pub company_id: i64,
    pub company_name: String,
    pub overall_rating: Option<f64>,
    pub ceo_approval: Option<f64>,
    pub recommend_to_friend: Option<f64>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub salary_currency: Option<String>,
    pub review_count: i64,
    pub interview_count: i64,
}
