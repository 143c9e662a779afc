// src/integrations/mod.rs
//! Outbound clients for third-party services. Every service is optional:
//! a missing credential leaves its client unset and callers degrade.

use anyhow::Result;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::app_log;
use crate::core::ServiceConfig;

pub mod glassdoor;
pub mod jsearch;
pub mod linkedin_jobs;
pub mod llm;
pub mod news_api;

pub use glassdoor::GlassdoorClient;
pub use jsearch::JSearchClient;
pub use linkedin_jobs::LinkedInJobsClient;
pub use llm::{ChatMessage, ChatRole, LlmClient};
pub use news_api::NewsApiClient;

#[derive(Debug, Clone, Default)]
pub struct Integrations {
    pub llm: Option<LlmClient>,
    pub glassdoor: Option<GlassdoorClient>,
    pub linkedin_jobs: Option<LinkedInJobsClient>,
    pub jsearch: Option<JSearchClient>,
    pub news: Option<NewsApiClient>,
}

impl Integrations {
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        let timeout = config.timeout_seconds;

        let llm = match &config.openai_api_key {
            Some(key) => Some(LlmClient::new(
                config.openai_api_url.clone(),
                key,
                config.openai_model.clone(),
                timeout,
            )?),
            None => None,
        };
        let glassdoor = match &config.glassdoor_api_key {
            Some(key) => Some(GlassdoorClient::new(
                config.glassdoor_base_url.clone(),
                &config.glassdoor_host,
                key,
                timeout,
            )?),
            None => None,
        };
        let linkedin_jobs = match &config.linkedin_jobs_api_key {
            Some(key) => Some(LinkedInJobsClient::new(
                config.linkedin_jobs_base_url.clone(),
                &config.linkedin_jobs_host,
                key,
                timeout,
            )?),
            None => None,
        };
        let jsearch = match &config.jsearch_api_key {
            Some(key) => Some(JSearchClient::new(
                config.jsearch_base_url.clone(),
                &config.jsearch_host,
                key,
                timeout,
            )?),
            None => None,
        };
        let news = match &config.news_api_key {
            Some(key) => Some(NewsApiClient::new(config.news_api_url.clone(), key, timeout)?),
            None => None,
        };

        Ok(Self {
            llm,
            glassdoor,
            linkedin_jobs,
            jsearch,
            news,
        })
    }
}

/// Decode each record on its own, logging and skipping the ones that do not
/// have the expected shape
pub(crate) fn decode_records<T: DeserializeOwned>(values: Vec<Value>, source: &str) -> Vec<T> {
    let total = values.len();
    let decoded: Vec<T> = values
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value::<T>(value) {
            Ok(record) => Some(record),
            Err(e) => {
                app_log!(warn, "[{}] skipping malformed record {}: {}", source, index, e);
                None
            }
        })
        .collect();

    if decoded.len() < total {
        app_log!(warn, "[{}] kept {} of {} records", source, decoded.len(), total);
    }
    decoded
}

/// Numbers that may arrive as JSON numbers or numeric strings
pub(crate) fn number_like(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

/// Identifiers that may arrive as numbers or strings
pub(crate) fn id_like(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Leading `YYYY-MM-DD` of a date or timestamp string
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn test_decode_records_skips_bad_shapes() {
        let values = vec![json!({"name": "a"}), json!({"nom": "b"}), json!(42), json!({"name": "c"})];
        let decoded: Vec<Named> = decode_records(values, "test");
        let names: Vec<&str> = decoded.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_number_like() {
        assert_eq!(number_like(Some(&json!(4.2))), Some(4.2));
        assert_eq!(number_like(Some(&json!("3.5"))), Some(3.5));
        assert_eq!(number_like(Some(&json!("n/a"))), None);
        assert_eq!(number_like(Some(&json!(null))), None);
        assert_eq!(number_like(None), None);
    }

    #[test]
    fn test_id_like_and_parse_date() {
        assert_eq!(id_like(Some(&json!(123))), Some("123".to_string()));
        assert_eq!(id_like(Some(&json!("abc"))), Some("abc".to_string()));
        assert_eq!(id_like(Some(&json!(""))), None);
        assert_eq!(
            parse_date("2024-05-17T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 5, 17)
        );
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_no_credentials_means_no_clients() {
        let integrations = Integrations::from_config(&ServiceConfig::default()).unwrap();
        assert!(integrations.llm.is_none());
        assert!(integrations.glassdoor.is_none());
        assert!(integrations.jsearch.is_none());
        assert!(integrations.news.is_none());
    }
}
