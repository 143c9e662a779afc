// src/services/jobs.rs
use anyhow::Result;
use sqlx::SqlitePool;

use super::SyncOutcome;
use crate::app_log;
use crate::database::{CompanyRepository, JobRepository};
use crate::integrations::jsearch::{JSearchJob, JobSearchParams};
use crate::integrations::{parse_date, JSearchClient};
use crate::types::{Company, JobOpening, NewJobOpening};
use crate::utils::{contains_ignore_case, location_label};

pub struct JobService<'a> {
    pool: &'a SqlitePool,
    jsearch: Option<&'a JSearchClient>,
}

impl<'a> JobService<'a> {
    pub fn new(pool: &'a SqlitePool, jsearch: Option<&'a JSearchClient>) -> Self {
        Self { pool, jsearch }
    }

    pub async fn by_company(&self, company_id: i64) -> Result<Vec<JobOpening>> {
        JobRepository::new(self.pool).for_company(company_id).await
    }

    /// Pull the company's current postings into the cache. `None` when the
    /// company does not exist.
    pub async fn refresh(&self, company_id: i64) -> Result<Option<SyncOutcome>> {
        let Some(company) = CompanyRepository::new(self.pool).find_by_id(company_id).await? else {
            return Ok(None);
        };

        let Some(client) = self.jsearch else {
            app_log!(warn, "[Jobs] JSearch not configured, skipping refresh for {}", company.name);
            return Ok(Some(SyncOutcome::failed("Job search is not configured")));
        };

        let params = JobSearchParams::for_query(format!("{} jobs", company.name));
        let response = match client.search(&params).await {
            Ok(response) => response,
            Err(e) => {
                app_log!(warn, "[Jobs] refresh failed for {}: {}", company.name, e);
                return Ok(Some(SyncOutcome::failed("Failed to fetch job openings")));
            }
        };

        let repository = JobRepository::new(self.pool);
        let mut stored = 0;
        for job in &response.data {
            if let Some(opening) = opening_for(&company, job) {
                repository.upsert(&opening).await?;
                stored += 1;
            }
        }

        app_log!(info, "[Jobs] cached {} postings for {}", stored, company.name);
        Ok(Some(SyncOutcome::synced(stored)))
    }
}

/// Postings from other employers or without an apply link are skipped
fn opening_for(company: &Company, job: &JSearchJob) -> Option<NewJobOpening> {
    let employer = job.employer_name.as_deref()?;
    if !contains_ignore_case(employer, &company.name) && !contains_ignore_case(&company.name, employer) {
        return None;
    }
    let external_url = job.job_apply_link.clone().filter(|url| !url.is_empty())?;

    let location = match (&job.job_city, &job.job_state) {
        (None, None) => job.job_country.clone(),
        (city, state) => Some(location_label(city.as_deref(), state.as_deref())),
    };

    Some(NewJobOpening {
        company_id: company.id,
        job_title: job.job_title.clone(),
        job_description: job.job_description.clone(),
        location,
        job_type: job.job_employment_type.clone(),
        salary_min: job.job_salary_min.map(|v| v.round() as i64),
        salary_max: job.job_salary_max.map(|v| v.round() as i64),
        currency: job.job_salary_currency.clone(),
        posted_date: job.job_posted_at_datetime_utc.as_deref().and_then(parse_date),
        external_url: Some(external_url),
        source: Some("JSearch".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{seed_company, seeded_pool};
    use serde_json::json;

    /// Expect matching postings cached once per apply link, others skipped
    #[tokio::test]
    async fn test_refresh_caches_matching_postings() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let id = seed_company(pool, "Acme", "Technology", None, &[]).await;

        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::UrlEncoded("query".into(), "Acme jobs".into()))
            .with_status(200)
            .with_body(
                json!({"status": "OK", "request_id": "r", "data": [
                    {"job_id": "1", "job_title": "Engineer", "employer_name": "Acme Inc",
                     "job_apply_link": "https://acme.example/1", "job_city": "Austin",
                     "job_state": "TX", "job_posted_at_datetime_utc": "2024-05-02T00:00:00.000Z",
                     "job_salary_min": 120000.4},
                    {"job_id": "2", "job_title": "Cook", "employer_name": "Other Co",
                     "job_apply_link": "https://other.example/2"},
                    {"job_id": "3", "job_title": "Designer", "employer_name": "ACME"}
                ]})
                .to_string(),
            )
            .expect(2)
            .create_async()
            .await;

        let client = JSearchClient::new(server.url(), "h", "k", 5).unwrap();
        let service = JobService::new(pool, Some(&client));

        let outcome = service.refresh(id).await.unwrap().unwrap();
        assert_eq!(outcome, SyncOutcome::synced(1));
        service.refresh(id).await.unwrap().unwrap();

        let jobs = service.by_company(id).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].location.as_deref(), Some("Austin, TX"));
        assert_eq!(jobs[0].salary_min, Some(120000));
        assert_eq!(jobs[0].currency, "USD");
    }

    #[tokio::test]
    async fn test_refresh_without_client_degrades() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let id = seed_company(pool, "Acme", "Technology", None, &[]).await;

        let service = JobService::new(pool, None);
        let outcome = service.refresh(id).await.unwrap().unwrap();
        assert!(!outcome.success);
        assert!(service.refresh(404).await.unwrap().is_none());
    }
}
