// src/types/review.rs
use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::{validate_max_length, validate_rating};

const MAX_TITLE_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmploymentStatus {
    Current,
    Former,
    Interviewing,
}

impl EmploymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentStatus::Current => "current",
            EmploymentStatus::Former => "former",
            EmploymentStatus::Interviewing => "interviewing",
        }
    }
}

/// User-submitted review; append-only apart from the flag
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousReview {
    pub id: i64,
    pub company_id: i64,
    pub rating: f64,
    pub title: Option<String>,
    pub review_text: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub job_title: Option<String>,
    pub employment_status: Option<String>,
    pub work_life_balance: Option<f64>,
    pub compensation_benefits: Option<f64>,
    pub career_opportunities: Option<f64>,
    pub culture_values: Option<f64>,
    pub senior_management: Option<f64>,
    pub is_helpful: i64,
    pub is_flagged: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub company_id: i64,
    pub rating: f64,
    pub title: Option<String>,
    pub review_text: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub job_title: Option<String>,
    pub employment_status: Option<EmploymentStatus>,
    pub work_life_balance: Option<f64>,
    pub compensation_benefits: Option<f64>,
    pub career_opportunities: Option<f64>,
    pub culture_values: Option<f64>,
    pub senior_management: Option<f64>,
}

impl NewReview {
    /// Field bounds checked before anything is written
    pub fn validate(&self) -> Result<()> {
        validate_rating("rating", Some(self.rating))?;
        validate_rating("workLifeBalance", self.work_life_balance)?;
        validate_rating("compensationBenefits", self.compensation_benefits)?;
        validate_rating("careerOpportunities", self.career_opportunities)?;
        validate_rating("cultureValues", self.culture_values)?;
        validate_rating("seniorManagement", self.senior_management)?;
        validate_max_length("title", self.title.as_deref(), MAX_TITLE_LEN)?;
        validate_max_length("jobTitle", self.job_title.as_deref(), MAX_TITLE_LEN)?;
        Ok(())
    }
}

/// Review scraped from an external source
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CompanyReview {
    pub id: i64,
    pub company_id: i64,
    pub source: String,
    pub rating: Option<f64>,
    pub title: Option<String>,
    pub review_text: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub sentiment_score: Option<f64>,
    pub review_date: Option<NaiveDate>,
    pub job_title: Option<String>,
    pub employment_status: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Averages are pre-formatted with two decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub avg_rating: String,
    pub avg_work_life_balance: Option<String>,
    pub avg_compensation_benefits: Option<String>,
    pub avg_career_opportunities: Option<String>,
    pub avg_culture_values: Option<String>,
    pub avg_senior_management: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: f64) -> NewReview {
        NewReview {
            company_id: 1,
            rating,
            title: Some("Great place".into()),
            review_text: None,
            pros: None,
            cons: None,
            job_title: Some("Engineer".into()),
            employment_status: Some(EmploymentStatus::Current),
            work_life_balance: Some(4.0),
            compensation_benefits: None,
            career_opportunities: None,
            culture_values: None,
            senior_management: None,
        }
    }

    #[test]
    fn test_validate_accepts_bounds() {
        assert!(review(1.0).validate().is_ok());
        assert!(review(5.0).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_ratings() {
        assert!(review(0.0).validate().is_err());
        assert!(review(6.0).validate().is_err());

        let mut bad_sub = review(4.0);
        bad_sub.senior_management = Some(7.5);
        assert!(bad_sub.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let mut long = review(4.0);
        long.title = Some("t".repeat(256));
        assert!(long.validate().is_err());
    }

    #[test]
    fn test_employment_status_parsing() {
        let parsed: EmploymentStatus = serde_json::from_str("\"former\"").unwrap();
        assert_eq!(parsed, EmploymentStatus::Former);
        assert!(serde_json::from_str::<EmploymentStatus>("\"contractor\"").is_err());
    }
}
