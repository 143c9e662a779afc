// src/integrations/jsearch.rs
//! JSearch job search through RapidAPI
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decode_records;
use crate::app_log;
use crate::core::ServiceClient;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobSearchParams {
    #[serde(default = "default_query")]
    pub query: String,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_page")]
    pub num_pages: u32,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_date_posted")]
    pub date_posted: String,
}

fn default_query() -> String {
    "software engineer jobs".to_string()
}

fn default_page() -> u32 {
    1
}

fn default_country() -> String {
    "us".to_string()
}

fn default_date_posted() -> String {
    "all".to_string()
}

impl Default for JobSearchParams {
    fn default() -> Self {
        Self {
            query: default_query(),
            page: default_page(),
            num_pages: default_page(),
            country: default_country(),
            date_posted: default_date_posted(),
        }
    }
}

impl JobSearchParams {
    pub fn for_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    fn as_query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("page", self.page.to_string()),
            ("num_pages", self.num_pages.to_string()),
            ("country", self.country.clone()),
            ("date_posted", self.date_posted.clone()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JSearchJob {
    pub job_id: String,
    pub job_title: String,
    pub employer_name: Option<String>,
    pub employer_logo: Option<String>,
    pub job_description: Option<String>,
    pub job_apply_link: Option<String>,
    pub job_city: Option<String>,
    pub job_state: Option<String>,
    pub job_country: Option<String>,
    pub job_posted_at_datetime_utc: Option<String>,
    pub job_employment_type: Option<String>,
    #[serde(default)]
    pub job_is_remote: bool,
    pub job_salary_currency: Option<String>,
    pub job_salary_min: Option<f64>,
    pub job_salary_max: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawSearchResponse {
    status: Option<String>,
    request_id: Option<String>,
    #[serde(default)]
    parameters: Value,
    #[serde(default)]
    data: Vec<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JobSearchResponse {
    pub status: String,
    pub request_id: String,
    pub parameters: Value,
    pub data: Vec<JSearchJob>,
    pub job_count: usize,
}

#[derive(Debug, Clone)]
pub struct JSearchClient {
    http: ServiceClient,
}

impl JSearchClient {
    pub fn new(base_url: String, host: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::rapidapi(base_url, host, api_key, timeout_seconds)?,
        })
    }

    /// Unlike the other integrations a failed search is an error
    pub async fn search(&self, params: &JobSearchParams) -> Result<JobSearchResponse> {
        app_log!(info, "[JSearch] searching '{}' page {}", params.query, params.page);

        let raw: RawSearchResponse = self
            .http
            .get_with_query("/search", &params.as_query())
            .await
            .context("JSearch request failed")?;

        let data: Vec<JSearchJob> = decode_records(raw.data, "JSearch");
        Ok(JobSearchResponse {
            status: raw.status.unwrap_or_else(|| "OK".to_string()),
            request_id: raw.request_id.unwrap_or_default(),
            parameters: raw.parameters,
            job_count: data.len(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Expect default parameters on the query string and bad records dropped
    #[tokio::test]
    async fn test_search_uses_defaults_and_skips_bad_records() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("query".into(), "software engineer jobs".into()),
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
                mockito::Matcher::UrlEncoded("country".into(), "us".into()),
                mockito::Matcher::UrlEncoded("date_posted".into(), "all".into()),
            ]))
            .match_header("x-rapidapi-host", "jsearch.p.rapidapi.com")
            .with_status(200)
            .with_body(
                json!({"status": "OK", "request_id": "r-1", "parameters": {"query": "x"},
                       "data": [
                           {"job_id": "j1", "job_title": "Engineer", "employer_name": "Acme",
                            "job_salary_min": 100000.0, "job_is_remote": true},
                           {"job_title": "No id"}
                       ]})
                .to_string(),
            )
            .create_async()
            .await;

        let client =
            JSearchClient::new(server.url(), "jsearch.p.rapidapi.com", "key", 5).unwrap();
        let response = client.search(&JobSearchParams::default()).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.request_id, "r-1");
        assert_eq!(response.job_count, 1);
        assert_eq!(response.data[0].employer_name.as_deref(), Some("Acme"));
        assert!(response.data[0].job_is_remote);
    }

    #[tokio::test]
    async fn test_search_error_propagates() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/search")
            .match_query(mockito::Matcher::Any)
            .with_status(403)
            .with_body("not subscribed")
            .create_async()
            .await;

        let client = JSearchClient::new(server.url(), "h", "key", 5).unwrap();
        assert!(client.search(&JobSearchParams::for_query("rust")).await.is_err());
    }

    #[test]
    fn test_params_deserialize_with_defaults() {
        let params: JobSearchParams = serde_json::from_value(json!({"query": "data jobs"})).unwrap();
        assert_eq!(params.query, "data jobs");
        assert_eq!(params.num_pages, 1);
        assert_eq!(params.date_posted, "all");
    }
}
