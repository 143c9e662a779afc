// src/integrations/news_api.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use super::decode_records;
use crate::core::ServiceClient;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ArticleSource {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    #[serde(default)]
    articles: Vec<Value>,
}

#[derive(Debug, Clone)]
pub struct NewsApiClient {
    http: ServiceClient,
}

impl NewsApiClient {
    pub fn new(base_url: String, api_key: &str, timeout_seconds: u64) -> Result<Self> {
        Ok(Self {
            http: ServiceClient::new(base_url, timeout_seconds, &[("X-Api-Key", api_key)])?,
        })
    }

    /// Most recent English articles mentioning `query`
    pub async fn everything(&self, query: &str, page_size: u32) -> Result<Vec<NewsArticle>> {
        let response: EverythingResponse = self
            .http
            .get_with_query(
                "/everything",
                &[
                    ("q", format!("\"{}\"", query)),
                    ("language", "en".to_string()),
                    ("sortBy", "publishedAt".to_string()),
                    ("pageSize", page_size.to_string()),
                ],
            )
            .await
            .with_context(|| format!("NewsAPI search for {} failed", query))?;

        Ok(decode_records(response.articles, "NewsAPI"))
    }
}
