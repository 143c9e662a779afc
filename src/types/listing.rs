// src/types/listing.rs
//! Cached external listings: job openings and news items
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobOpening {
    pub id: i64,
    pub company_id: i64,
    pub job_title: String,
    pub job_description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub currency: String,
    pub posted_date: Option<NaiveDate>,
    pub external_url: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewJobOpening {
    pub company_id: i64,
    pub job_title: String,
    pub job_description: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub currency: Option<String>,
    pub posted_date: Option<NaiveDate>,
    pub external_url: Option<String>,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyNews {
    pub id: i64,
    pub company_id: Option<i64>,
    pub industry_category: Option<String>,
    pub headline: String,
    pub summary: Option<String>,
    pub full_content: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    /// positive, neutral or negative
    pub sentiment: Option<String>,
    pub relevance_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCompanyNews {
    pub company_id: Option<i64>,
    pub industry_category: Option<String>,
    pub headline: String,
    pub summary: Option<String>,
    pub full_content: Option<String>,
    pub source_url: Option<String>,
    pub source_name: Option<String>,
    pub published_date: Option<DateTime<Utc>>,
    pub sentiment: Option<String>,
    pub relevance_score: Option<f64>,
}
