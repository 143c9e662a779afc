// src/integrations/linkedin_jobs.rs
use anyhow::Result;
use serde::Serialize;
use serde_json::{Map, Value};

use super::id_like;
use crate::app_log;
use crate::core::ServiceClient;

/// Job posting details; the API has shipped several field spellings over time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInJob {
    pub job_id: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    pub seniority_level: Option<String>,
    pub posted_date: Option<String>,
    pub description: Option<String>,
    pub apply_url: Option<String>,
    pub company_logo_url: Option<String>,
    pub remote: bool,
    pub ai_work_arrangement: Option<String>,
    pub ai_experience_level: Option<String>,
    pub ai_visa_sponsorship: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct LinkedInJobsClient {
    http: ServiceClient,
}

impl LinkedInJobsClient {
    pub fn new(base_url: String, host: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::rapidapi(base_url, host, api_key, timeout_seconds)?,
        })
    }

    /// `None` on any failure
    pub async fn job_details(&self, job_id: &str) -> Option<LinkedInJob> {
        let body: Value = match self.http.get(&format!("/job/{}", job_id)).await {
            Ok(body) => body,
            Err(e) => {
                app_log!(warn, "[LinkedIn Jobs] details unavailable for {}: {}", job_id, e);
                return None;
            }
        };

        let record = body.as_object()?;
        Some(job_from_record(record, job_id))
    }
}

fn first_text(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key).and_then(Value::as_str))
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn job_from_record(record: &Map<String, Value>, requested_id: &str) -> LinkedInJob {
    let job_id = id_like(record.get("job_id"))
        .or_else(|| id_like(record.get("id")))
        .unwrap_or_else(|| requested_id.to_string());

    LinkedInJob {
        job_id,
        title: first_text(record, &["job_title", "title"]),
        company: first_text(record, &["company_name", "company"]),
        location: first_text(record, &["job_location", "location"]),
        job_type: first_text(record, &["job_employment_type", "type"]),
        seniority_level: first_text(record, &["seniority_level"]),
        posted_date: first_text(record, &["job_posted_date", "posted_date"]),
        description: first_text(record, &["job_description", "description"]),
        apply_url: first_text(record, &["job_apply_link", "apply_url"]),
        company_logo_url: first_text(record, &["company_logo_url"]),
        remote: record
            .get("job_is_remote")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        ai_work_arrangement: first_text(record, &["ai_work_arrangement"]),
        ai_experience_level: first_text(record, &["ai_experience_level"]),
        ai_visa_sponsorship: record.get("ai_visa_sponsorship").and_then(Value::as_bool),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Expect alternate field spellings to be picked up
    #[tokio::test]
    async fn test_job_details_field_fallbacks() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/abc")
            .with_status(200)
            .with_body(
                json!({"id": 77, "title": "Staff Engineer", "company": "Acme",
                       "job_location": "Austin, TX", "job_is_remote": true,
                       "apply_url": "https://jobs.example/77"})
                .to_string(),
            )
            .create_async()
            .await;

        let client = LinkedInJobsClient::new(server.url(), "host", "key", 5).unwrap();
        let job = client.job_details("abc").await.unwrap();
        assert_eq!(job.job_id, "77");
        assert_eq!(job.title.as_deref(), Some("Staff Engineer"));
        assert_eq!(job.company.as_deref(), Some("Acme"));
        assert_eq!(job.location.as_deref(), Some("Austin, TX"));
        assert_eq!(job.apply_url.as_deref(), Some("https://jobs.example/77"));
        assert!(job.remote);
        assert_eq!(job.ai_visa_sponsorship, None);
    }

    #[tokio::test]
    async fn test_job_details_failure_is_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/job/missing")
            .with_status(404)
            .create_async()
            .await;

        let client = LinkedInJobsClient::new(server.url(), "host", "key", 5).unwrap();
        assert!(client.job_details("missing").await.is_none());
    }
}
