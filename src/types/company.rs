// src/types/company.rs
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::location_label;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size_range: Option<String>,
    pub headquarters_city: Option<String>,
    pub headquarters_state: Option<String>,
    pub headquarters_country: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    /// Annualized percentage of employees leaving
    pub turnover_rate: Option<f64>,
    /// Average tenure in years
    pub avg_tenure: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Company {
    /// "City, State" as used by location filtering
    pub fn location(&self) -> String {
        location_label(
            self.headquarters_city.as_deref(),
            self.headquarters_state.as_deref(),
        )
    }
}

/// Insert payload for seeding
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub size_range: Option<String>,
    pub headquarters_city: Option<String>,
    pub headquarters_state: Option<String>,
    pub headquarters_country: Option<String>,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub turnover_rate: Option<f64>,
    pub avg_tenure: Option<f64>,
}

/// One source's ratings for a company. Metrics are 0-5, CEO approval and
/// recommend-to-friend are percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CultureScore {
    pub id: i64,
    pub company_id: i64,
    pub source: String,
    pub overall_rating: Option<f64>,
    pub work_life_balance: Option<f64>,
    pub compensation_benefits: Option<f64>,
    pub career_opportunities: Option<f64>,
    pub culture_values: Option<f64>,
    pub senior_management: Option<f64>,
    pub ceo_approval: Option<f64>,
    pub recommend_to_friend: Option<f64>,
    pub review_count: Option<i64>,
    pub date_collected: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct NewCultureScore {
    pub company_id: i64,
    pub source: String,
    pub overall_rating: Option<f64>,
    pub work_life_balance: Option<f64>,
    pub compensation_benefits: Option<f64>,
    pub career_opportunities: Option<f64>,
    pub culture_values: Option<f64>,
    pub senior_management: Option<f64>,
    pub ceo_approval: Option<f64>,
    pub recommend_to_friend: Option<f64>,
    pub review_count: Option<i64>,
    pub date_collected: Option<NaiveDate>,
}

/// Derived per-company averages across sources; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    pub overall_rating: Option<f64>,
    pub work_life_balance: Option<f64>,
    pub compensation_benefits: Option<f64>,
    pub career_opportunities: Option<f64>,
    pub culture_values: Option<f64>,
    pub senior_management: Option<f64>,
    pub ceo_approval: Option<f64>,
    pub recommend_to_friend: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CultureTrend {
    pub id: i64,
    pub company_id: i64,
    pub metric_name: String,
    pub metric_value: f64,
    /// "YYYY-MM"
    pub month_year: String,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LayoffEvent {
    pub id: i64,
    pub company_id: i64,
    pub date: NaiveDate,
    pub employees_affected: Option<i64>,
    pub percentage_of_workforce: Option<f64>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A company together with its aggregate (null when it has no score rows)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCompany {
    #[serde(flatten)]
    pub company: Company,
    pub aggregate_score: Option<AggregateScore>,
}

impl ScoredCompany {
    pub fn overall(&self) -> Option<f64> {
        self.aggregate_score
            .as_ref()
            .and_then(|score| score.overall_rating)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    pub company: Company,
    pub scores: Vec<CultureScore>,
    pub trends: Vec<CultureTrend>,
    pub layoffs: Vec<LayoffEvent>,
    pub sourced_reviews: Vec<super::CompanyReview>,
}
