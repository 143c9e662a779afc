// src/services/glassdoor.rs
use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::app_log;
use crate::database::GlassdoorRepository;
use crate::integrations::glassdoor::{GlassdoorCompany, GlassdoorInterview};
use crate::integrations::{parse_date, GlassdoorClient};
use crate::types::{GlassdoorMetrics, InterviewRecord, NewGlassdoorMetrics, NewInterview};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interviews_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct GlassdoorService<'a> {
    pool: &'a SqlitePool,
    client: Option<&'a GlassdoorClient>,
}

impl<'a> GlassdoorService<'a> {
    pub fn new(pool: &'a SqlitePool, client: Option<&'a GlassdoorClient>) -> Self {
        Self { pool, client }
    }

    pub async fn interviews(&self, company_id: i64, limit: i64) -> Result<Vec<InterviewRecord>> {
        GlassdoorRepository::new(self.pool)
            .interviews_for_company(company_id, limit)
            .await
    }

    pub async fn interviews_by_title(
        &self,
        company_id: i64,
        job_title: &str,
        limit: i64,
    ) -> Result<Vec<InterviewRecord>> {
        GlassdoorRepository::new(self.pool)
            .interviews_by_title(company_id, job_title, limit)
            .await
    }

    pub async fn metrics(&self, company_id: i64) -> Result<Option<GlassdoorMetrics>> {
        GlassdoorRepository::new(self.pool)
            .metrics_for_company(company_id)
            .await
    }

    /// Fetch interviews and company figures and cache both. Never fails:
    /// problems come back as an unsuccessful outcome.
    pub async fn fetch_and_cache(&self, company_id: i64, company_name: &str) -> FetchOutcome {
        match self.sync(company_id, company_name).await {
            Ok(count) => FetchOutcome {
                success: true,
                interviews_count: Some(count),
                error: None,
            },
            Err(e) => {
                app_log!(error, "[Glassdoor] Error fetching and caching data: {}", e);
                FetchOutcome {
                    success: false,
                    interviews_count: None,
                    error: Some("Failed to fetch Glassdoor data".to_string()),
                }
            }
        }
    }

    async fn sync(&self, company_id: i64, company_name: &str) -> Result<usize> {
        let Some(client) = self.client else {
            app_log!(warn, "[Glassdoor] API credentials not configured");
            return Ok(0);
        };

        let repository = GlassdoorRepository::new(self.pool);

        let interviews = client.fetch_interviews(company_name).await;
        for interview in &interviews {
            repository
                .upsert_interview(&interview_row(company_id, interview))
                .await?;
        }

        if let Some(company) = client.fetch_company(company_name).await {
            repository
                .upsert_metrics(&metrics_row(company_id, company_name, &company, interviews.len()))
                .await?;
        }

        app_log!(info, "[Glassdoor] cached {} interviews for {}", interviews.len(), company_name);
        Ok(interviews.len())
    }
}

fn interview_row(company_id: i64, interview: &GlassdoorInterview) -> NewInterview {
    let present = |value: &str| Some(value.to_string()).filter(|v| !v.is_empty());

    NewInterview {
        company_id,
        external_id: present(&interview.id),
        job_title: interview.job_title.clone(),
        interview_type: present(&interview.interview_type),
        difficulty: present(&interview.difficulty),
        duration: present(&interview.duration),
        questions: interview.questions.clone(),
        experience: present(&interview.experience),
        outcome: present(&interview.outcome),
        interview_date: parse_date(&interview.interview_date),
    }
}

/// Zero means "not reported" and is stored as null
fn metrics_row(
    company_id: i64,
    company_name: &str,
    company: &GlassdoorCompany,
    interview_count: usize,
) -> NewGlassdoorMetrics {
    let reported = |value: f64| Some(value).filter(|v| *v != 0.0);

    NewGlassdoorMetrics {
        company_id,
        company_name: company_name.to_string(),
        overall_rating: reported(company.overall_rating),
        ceo_approval: reported(company.ceo_approval),
        recommend_to_friend: reported(company.recommend_to_friend),
        salary_min: company.salary_estimate.as_ref().map(|s| s.min.round() as i64),
        salary_max: company.salary_estimate.as_ref().map(|s| s.max.round() as i64),
        salary_currency: company.salary_estimate.as_ref().map(|s| s.currency.clone()),
        review_count: 0,
        interview_count: interview_count as i64,
    }
}
