// src/integrations/glassdoor.rs
//! Glassdoor data through its RapidAPI proxy. Every call degrades to an
//! empty result and a warning when the proxy misbehaves.
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use super::{decode_records, id_like, number_like};
use crate::app_log;
use crate::core::ServiceClient;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassdoorInterview {
    pub id: String,
    pub job_title: String,
    pub company_name: String,
    pub interview_date: String,
    pub interview_type: String,
    pub difficulty: String,
    pub duration: String,
    pub questions: Vec<String>,
    pub experience: String,
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryEstimate {
    pub min: f64,
    pub max: f64,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlassdoorCompany {
    pub company_name: String,
    /// 0 when the proxy sends nothing usable
    pub overall_rating: f64,
    pub ceo_approval: f64,
    pub recommend_to_friend: f64,
    pub salary_estimate: Option<SalaryEstimate>,
}

#[derive(Debug, Clone)]
pub struct GlassdoorClient {
    http: ServiceClient,
}

impl GlassdoorClient {
    pub fn new(base_url: String, host: &str, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::rapidapi(base_url, host, api_key, timeout_seconds)?,
        })
    }

    pub async fn fetch_interviews(&self, company_name: &str) -> Vec<GlassdoorInterview> {
        let body: Value = match self
            .http
            .get_with_query("/companies/interviews", &[("companyName", company_name.to_string())])
            .await
        {
            Ok(body) => body,
            Err(e) => {
                app_log!(warn, "[Glassdoor] interviews unavailable for {}: {}", company_name, e);
                return Vec::new();
            }
        };

        let raw = body
            .pointer("/data/employerInterviews/interviews")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let records: Vec<serde_json::Map<String, Value>> = decode_records(raw, "Glassdoor");
        records
            .iter()
            .map(|record| interview_from_record(record, company_name))
            .collect()
    }

    pub async fn fetch_company(&self, company_name: &str) -> Option<GlassdoorCompany> {
        let body: Value = match self
            .http
            .get_with_query("/companies", &[("companyName", company_name.to_string())])
            .await
        {
            Ok(body) => body,
            Err(e) => {
                app_log!(warn, "[Glassdoor] company data unavailable for {}: {}", company_name, e);
                return None;
            }
        };

        let company = body.pointer("/data/0")?.as_object()?;
        let salary_estimate = company
            .get("salaryEstimate")
            .and_then(Value::as_object)
            .map(|estimate| SalaryEstimate {
                min: number_like(estimate.get("min")).unwrap_or(0.0),
                max: number_like(estimate.get("max")).unwrap_or(0.0),
                currency: text(estimate.get("currency")).unwrap_or_else(|| "USD".to_string()),
            });

        Some(GlassdoorCompany {
            company_name: text(company.get("name")).unwrap_or_else(|| company_name.to_string()),
            overall_rating: number_like(company.get("overallRating")).unwrap_or(0.0),
            ceo_approval: number_like(company.get("ceoApproval")).unwrap_or(0.0),
            recommend_to_friend: number_like(company.get("recommendToFriend")).unwrap_or(0.0),
            salary_estimate,
        })
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn interview_from_record(record: &serde_json::Map<String, Value>, company_name: &str) -> GlassdoorInterview {
    let or = |key: &str, fallback: &str| text(record.get(key)).unwrap_or_else(|| fallback.to_string());

    let questions = record
        .get("questions")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|q| q.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    GlassdoorInterview {
        id: id_like(record.get("id")).unwrap_or_default(),
        job_title: or("jobTitle", "Unknown"),
        company_name: company_name.to_string(),
        interview_date: or("interviewDate", ""),
        interview_type: or("interviewType", "Unknown"),
        difficulty: or("difficulty", "Not specified"),
        duration: or("duration", "Unknown"),
        questions,
        experience: or("experience", ""),
        outcome: or("outcome", "Not specified"),
    }
}
