// src/services/news.rs
//! Company and industry news: NewsAPI articles when configured, otherwise a
//! model-written summary item.
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::SyncOutcome;
use crate::app_log;
use crate::database::{CompanyRepository, NewsRepository};
use crate::integrations::news_api::NewsArticle;
use crate::integrations::{ChatMessage, LlmClient, NewsApiClient};
use crate::types::{Company, CompanyNews, NewCompanyNews};

const ARTICLES_PER_REFRESH: u32 = 10;
const NEWS_SYSTEM_PROMPT: &str = "You are a financial news analyst. Generate a realistic recent \
     news item about the company. Return ONLY valid JSON with no additional text.";
const INDUSTRY_SYSTEM_PROMPT: &str = "You are a financial news analyst. Generate a realistic \
     recent industry news item. Return ONLY valid JSON with no additional text.";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedNews {
    headline: String,
    summary: String,
    sentiment: String,
    source_name: String,
    relevance_score: f64,
}

fn news_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "headline": {"type": "string", "description": "News headline"},
            "summary": {"type": "string", "description": "News summary"},
            "sentiment": {
                "type": "string",
                "enum": ["positive", "negative", "neutral"],
                "description": "Sentiment of the news"
            },
            "sourceName": {"type": "string", "description": "News source name"},
            "relevanceScore": {"type": "number", "description": "Relevance score 0-1"}
        },
        "required": ["headline", "summary", "sentiment", "sourceName", "relevanceScore"],
        "additionalProperties": false
    })
}

pub struct NewsService<'a> {
    pool: &'a SqlitePool,
    news_api: Option<&'a NewsApiClient>,
    llm: Option<&'a LlmClient>,
}

impl<'a> NewsService<'a> {
    pub fn new(
        pool: &'a SqlitePool,
        news_api: Option<&'a NewsApiClient>,
        llm: Option<&'a LlmClient>,
    ) -> Self {
        Self { pool, news_api, llm }
    }

    pub async fn by_company(&self, company_id: i64, limit: i64) -> Result<Vec<CompanyNews>> {
        NewsRepository::new(self.pool).for_company(company_id, limit).await
    }

    pub async fn by_industry(&self, category: &str, limit: i64) -> Result<Vec<CompanyNews>> {
        NewsRepository::new(self.pool).for_industry(category, limit).await
    }

    /// `None` when the company does not exist
    pub async fn refresh(&self, company_id: i64) -> Result<Option<SyncOutcome>> {
        let Some(company) = CompanyRepository::new(self.pool).find_by_id(company_id).await? else {
            return Ok(None);
        };

        let items = match self.news_api {
            Some(client) => match client.everything(&company.name, ARTICLES_PER_REFRESH).await {
                Ok(articles) => articles
                    .iter()
                    .map(|article| news_from_article(&company, article))
                    .collect(),
                Err(e) => {
                    app_log!(warn, "[News] NewsAPI failed for {}: {}", company.name, e);
                    return Ok(Some(SyncOutcome::failed("Failed to fetch news")));
                }
            },
            None => {
                let industry = company.industry.clone().unwrap_or_default();
                match self
                    .generate_company_news(&company.name, &industry, Some(company.id))
                    .await
                {
                    Some(item) => vec![item],
                    None => return Ok(Some(SyncOutcome::failed("Failed to generate news"))),
                }
            }
        };

        let repository = NewsRepository::new(self.pool);
        for item in &items {
            repository.upsert(item).await?;
        }
        app_log!(info, "[News] stored {} items for {}", items.len(), company.name);
        Ok(Some(SyncOutcome::synced(items.len())))
    }

    /// One model-written item about a company; `None` on any failure
    pub async fn generate_company_news(
        &self,
        company_name: &str,
        industry: &str,
        company_id: Option<i64>,
    ) -> Option<NewCompanyNews> {
        let prompt = format!(
            "Generate a recent news headline and summary for {} ({} industry).\n\
             Include realistic details about company announcements, earnings, partnerships, or industry trends.\n\n\
             Return JSON with this exact structure:\n\
             {{\n  \"headline\": \"News headline (max 100 chars)\",\n  \"summary\": \"2-3 sentence summary\",\n  \
             \"sentiment\": \"positive\" | \"negative\" | \"neutral\",\n  \
             \"sourceName\": \"TechCrunch\" | \"Bloomberg\" | \"Reuters\" | \"CNBC\" (pick one),\n  \
             \"relevanceScore\": 0.85\n}}",
            company_name, industry
        );
        let generated = self
            .generate(NEWS_SYSTEM_PROMPT, prompt, "company_news")
            .await?;
        Some(news_from_generated(generated, company_id, industry))
    }

    /// One model-written item about an industry; `None` on any failure
    pub async fn generate_industry_news(&self, industry: &str) -> Option<NewCompanyNews> {
        let prompt = format!(
            "Generate a recent industry news headline and summary for the {} sector.\n\
             Include realistic details about market trends, regulations, innovations, or major announcements.\n\n\
             Return JSON with this exact structure:\n\
             {{\n  \"headline\": \"Industry news headline (max 100 chars)\",\n  \"summary\": \"2-3 sentence summary\",\n  \
             \"sentiment\": \"positive\" | \"negative\" | \"neutral\",\n  \
             \"sourceName\": \"TechCrunch\" | \"Bloomberg\" | \"Reuters\" | \"CNBC\" | \"Wall Street Journal\" (pick one),\n  \
             \"relevanceScore\": 0.8\n}}",
            industry
        );
        let generated = self
            .generate(INDUSTRY_SYSTEM_PROMPT, prompt, "industry_news")
            .await?;
        Some(news_from_generated(generated, None, industry))
    }

    async fn generate(&self, system: &str, prompt: String, schema_name: &str) -> Option<GeneratedNews> {
        let Some(llm) = self.llm else {
            app_log!(warn, "[News] LLM not configured, cannot generate {}", schema_name);
            return None;
        };

        let messages = [ChatMessage::system(system), ChatMessage::user(prompt)];
        match llm
            .complete_json::<GeneratedNews>(&messages, schema_name, &news_schema())
            .await
        {
            Ok(generated) => Some(generated),
            Err(e) => {
                app_log!(error, "[News] generating {} failed: {}", schema_name, e);
                None
            }
        }
    }

    /// Generate and store one item per company and per industry. Returns how
    /// many items were stored.
    pub async fn seed(&self, companies: &[Company], industries: &[String]) -> Result<usize> {
        let repository = NewsRepository::new(self.pool);
        let mut stored = 0;

        for company in companies {
            let industry = company.industry.clone().unwrap_or_default();
            if let Some(item) = self
                .generate_company_news(&company.name, &industry, Some(company.id))
                .await
            {
                repository.upsert(&item).await?;
                stored += 1;
                app_log!(info, "✓ Generated news for {}", company.name);
            }
        }

        for industry in industries {
            if let Some(item) = self.generate_industry_news(industry).await {
                repository.upsert(&item).await?;
                stored += 1;
                app_log!(info, "✓ Generated industry news for {}", industry);
            }
        }

        Ok(stored)
    }
}

fn news_from_generated(generated: GeneratedNews, company_id: Option<i64>, industry: &str) -> NewCompanyNews {
    NewCompanyNews {
        company_id,
        industry_category: Some(industry.to_string()).filter(|i| !i.is_empty()),
        headline: generated.headline,
        summary: Some(generated.summary),
        full_content: None,
        source_url: None,
        source_name: Some(generated.source_name),
        published_date: Some(Utc::now()),
        sentiment: Some(generated.sentiment),
        relevance_score: Some(generated.relevance_score.clamp(0.0, 1.0)),
    }
}

fn news_from_article(company: &Company, article: &NewsArticle) -> NewCompanyNews {
    let published_date = article
        .published_at
        .as_deref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|date| date.with_timezone(&Utc));

    NewCompanyNews {
        company_id: Some(company.id),
        industry_category: company.industry.clone(),
        headline: article.title.clone(),
        summary: article.description.clone(),
        full_content: article.content.clone(),
        source_url: Some(article.url.clone()),
        source_name: article.source.as_ref().and_then(|source| source.name.clone()),
        published_date,
        sentiment: None,
        relevance_score: None,
    }
}
