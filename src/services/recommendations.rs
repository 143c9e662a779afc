// src/services/recommendations.rs
//! Company recommendations and similar-company suggestions. Both ask the
//! language model first and fall back to deterministic ranking; the outcome
//! says which one produced the list.
use std::cmp::Ordering;

use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use sqlx::SqlitePool;

use super::CompanyService;
use crate::app_log;
use crate::integrations::{ChatMessage, LlmClient};
use crate::scoring::rank_similar;
use crate::types::{AiSimilarCompany, RankingOutcome, Recommendation, ScoredCompany, SimilarCompany};

pub const DEFAULT_RECOMMENDATIONS: usize = 5;
const MAX_RECOMMENDATION_CANDIDATES: usize = 20;
const MAX_SIMILAR_CANDIDATES: usize = 30;
const ADVISOR_SYSTEM_PROMPT: &str =
    "You are a helpful career advisor. Always respond with valid JSON.";

pub type SimilarOutcome = RankingOutcome<AiSimilarCompany, SimilarCompany>;
pub type RecommendationOutcome = RankingOutcome<Recommendation, ScoredCompany>;

/// What the user is looking for in an employer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceCriteria {
    pub preferred_industry: Option<String>,
    pub preferred_location: Option<String>,
    pub preferred_size: Option<String>,
    pub min_culture_score: Option<f64>,
    pub max_culture_score: Option<f64>,
    #[serde(default)]
    pub priorities: Vec<String>,
    #[serde(default)]
    pub exclude_company_ids: Vec<i64>,
    pub limit: Option<usize>,
}

impl PreferenceCriteria {
    fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_RECOMMENDATIONS)
    }

    /// Exact industry and size, case-insensitive "City, State", score bounds
    /// against the overall rating (unknown counts as 0), exclusions
    fn accepts(&self, candidate: &ScoredCompany) -> bool {
        let company = &candidate.company;

        if let Some(industry) = non_empty(&self.preferred_industry) {
            if company.industry.as_deref() != Some(industry) {
                return false;
            }
        }
        if let Some(location) = non_empty(&self.preferred_location) {
            if company.location().to_lowercase() != location.to_lowercase() {
                return false;
            }
        }
        if let Some(size) = non_empty(&self.preferred_size) {
            if company.size_range.as_deref() != Some(size) {
                return false;
            }
        }

        let score = candidate.overall().unwrap_or(0.0);
        if self.min_culture_score.is_some_and(|min| min > 0.0 && score < min) {
            return false;
        }
        if self.max_culture_score.is_some_and(|max| max > 0.0 && score > max) {
            return false;
        }

        !self.exclude_company_ids.contains(&company.id)
    }

    fn priorities_text(&self) -> String {
        if self.priorities.is_empty() {
            "overall culture fit".to_string()
        } else {
            self.priorities.join(", ")
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn rating(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "N/A".to_string())
}

fn text(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("Unknown")
}

fn by_overall_desc(a: &ScoredCompany, b: &ScoredCompany) -> Ordering {
    let a_score = a.overall().unwrap_or(0.0);
    let b_score = b.overall().unwrap_or(0.0);
    b_score
        .partial_cmp(&a_score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.company.id.cmp(&b.company.id))
}

fn find_by_name<'c>(candidates: &'c [ScoredCompany], name: &str) -> Option<&'c ScoredCompany> {
    let wanted = name.trim().to_lowercase();
    candidates
        .iter()
        .find(|candidate| candidate.company.name.to_lowercase() == wanted)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RankedPick {
    rank: f64,
    name: String,
    match_reason: String,
    key_strengths: String,
}

#[derive(Debug, Deserialize)]
struct RankedPicks {
    recommendations: Vec<RankedPick>,
}

#[derive(Debug, Deserialize)]
struct SimilarPick {
    name: String,
    similarity_reason: String,
}

#[derive(Debug, Deserialize)]
struct SimilarPicks {
    similar_companies: Vec<SimilarPick>,
}

fn recommendations_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "recommendations": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "rank": {"type": "number"},
                        "name": {"type": "string"},
                        "matchReason": {"type": "string"},
                        "keyStrengths": {"type": "string"}
                    },
                    "required": ["rank", "name", "matchReason", "keyStrengths"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["recommendations"],
        "additionalProperties": false
    })
}

fn similar_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "similar_companies": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "similarity_reason": {"type": "string"}
                    },
                    "required": ["name", "similarity_reason"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["similar_companies"],
        "additionalProperties": false
    })
}

pub struct RecommendationService<'a> {
    pool: &'a SqlitePool,
    llm: Option<&'a LlmClient>,
}

impl<'a> RecommendationService<'a> {
    pub fn new(pool: &'a SqlitePool, llm: Option<&'a LlmClient>) -> Self {
        Self { pool, llm }
    }

    /// Deterministic neighbours; `None` when the reference company is unknown
    pub async fn similar(&self, company_id: i64, limit: usize) -> Result<Option<Vec<SimilarCompany>>> {
        let companies = CompanyService::new(self.pool);
        let Some(reference) = companies.scored(company_id).await? else {
            return Ok(None);
        };
        let candidates = companies.all_scored().await?;
        Ok(Some(rank_similar(&reference, candidates, limit)))
    }

    /// Model-picked neighbours with reasons, or the deterministic ranking
    /// when the model is unavailable or answers badly
    pub async fn similar_with_reasons(
        &self,
        company_id: i64,
        limit: usize,
    ) -> Result<Option<SimilarOutcome>> {
        let companies = CompanyService::new(self.pool);
        let Some(reference) = companies.scored(company_id).await? else {
            return Ok(None);
        };
        let candidates = companies.all_scored().await?;

        if let Some(llm) = self.llm {
            match self.ask_similar(llm, &reference, &candidates, limit).await {
                Ok(picks) => return Ok(Some(RankingOutcome::Ai(picks))),
                Err(e) => {
                    app_log!(warn, "[Similar Companies] model ranking failed, using heuristic: {}", e)
                }
            }
        }

        Ok(Some(RankingOutcome::Heuristic(rank_similar(
            &reference, candidates, limit,
        ))))
    }

    async fn ask_similar(
        &self,
        llm: &LlmClient,
        reference: &ScoredCompany,
        candidates: &[ScoredCompany],
        limit: usize,
    ) -> Result<Vec<AiSimilarCompany>> {
        let others: Vec<ScoredCompany> = candidates
            .iter()
            .filter(|c| c.company.id != reference.company.id)
            .cloned()
            .collect();

        let company = &reference.company;
        let aggregate = reference.aggregate_score.clone().unwrap_or_default();
        let reference_text = format!(
            "{} is a {} company with {} employees located in {}. Culture Score: {}/5, \
             Work-Life Balance: {}/5, Compensation: {}/5",
            company.name,
            text(&company.industry),
            text(&company.size_range),
            company.location(),
            rating(aggregate.overall_rating),
            rating(aggregate.work_life_balance),
            rating(aggregate.compensation_benefits),
        );

        let list = others
            .iter()
            .take(MAX_SIMILAR_CANDIDATES)
            .map(|c| {
                format!(
                    "- {} ({}, {}, Size: {}, Culture: {}/5)",
                    c.company.name,
                    text(&c.company.industry),
                    c.company.location(),
                    text(&c.company.size_range),
                    rating(c.overall()),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are a career advisor. Given this company:\n\n{}\n\n\
             Find the top {} most similar companies from this list based on industry, \
             company culture, size, and location:\n\n{}\n\n\
             For each similar company, explain why it's similar in 1-2 sentences.\n\n\
             Format as JSON array with objects containing: name, similarity_reason",
            reference_text, limit, list
        );

        let messages = [ChatMessage::system(ADVISOR_SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let picks: SimilarPicks = llm
            .complete_json(&messages, "similar_companies", &similar_schema())
            .await?;

        Ok(picks
            .similar_companies
            .into_iter()
            .filter_map(|pick| {
                find_by_name(&others, &pick.name).map(|company| AiSimilarCompany {
                    company: company.clone(),
                    similarity_reason: pick.similarity_reason,
                })
            })
            .take(limit)
            .collect())
    }

    /// Recommendations for a set of preferences
    pub async fn recommend(&self, criteria: &PreferenceCriteria) -> Result<RecommendationOutcome> {
        let limit = criteria.limit();
        let candidates: Vec<ScoredCompany> = CompanyService::new(self.pool)
            .all_scored()
            .await?
            .into_iter()
            .filter(|candidate| criteria.accepts(candidate))
            .collect();

        if candidates.is_empty() {
            return Ok(RankingOutcome::Heuristic(Vec::new()));
        }

        if let Some(llm) = self.llm {
            match self.ask_recommendations(llm, criteria, &candidates, limit).await {
                Ok(picks) => return Ok(RankingOutcome::Ai(picks)),
                Err(e) => {
                    app_log!(warn, "[Recommendation] model ranking failed, sorting by score: {}", e)
                }
            }
        }

        let mut fallback = candidates;
        fallback.sort_by(by_overall_desc);
        fallback.truncate(limit);
        Ok(RankingOutcome::Heuristic(fallback))
    }

    async fn ask_recommendations(
        &self,
        llm: &LlmClient,
        criteria: &PreferenceCriteria,
        candidates: &[ScoredCompany],
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let top_n = limit.min(candidates.len());
        let list = candidates
            .iter()
            .take(MAX_RECOMMENDATION_CANDIDATES)
            .map(|c| {
                let aggregate = c.aggregate_score.clone().unwrap_or_default();
                format!(
                    "- {} ({}, {}, Size: {}, Culture Score: {}/5, Work-Life Balance: {}/5, Compensation: {}/5)",
                    c.company.name,
                    text(&c.company.industry),
                    c.company.location(),
                    text(&c.company.size_range),
                    rating(aggregate.overall_rating),
                    rating(aggregate.work_life_balance),
                    rating(aggregate.compensation_benefits),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let prompt = format!(
            "You are a career advisor helping someone find the best company to work for.\n\n\
             Given these companies:\n{}\n\n\
             User priorities: {}\n\n\
             Rank the top {n} companies that best match the user's priorities. For each company, provide:\n\
             1. Ranking position (1-{n})\n\
             2. Company name\n\
             3. Why it's a good match (1-2 sentences)\n\
             4. Key strengths for this user's priorities\n\n\
             Format as JSON array with objects containing: rank, name, matchReason, keyStrengths",
            list,
            criteria.priorities_text(),
            n = top_n
        );

        let messages = [ChatMessage::system(ADVISOR_SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let picks: RankedPicks = llm
            .complete_json(&messages, "recommendations", &recommendations_schema())
            .await?;

        Ok(picks
            .recommendations
            .into_iter()
            .filter_map(|pick| {
                find_by_name(candidates, &pick.name).map(|company| Recommendation {
                    company: company.clone(),
                    rank: pick.rank.max(0.0).round() as u32,
                    match_reason: pick.match_reason,
                    key_strengths: pick.key_strengths,
                })
            })
            .take(limit)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{seed_company, seeded_pool};

    fn completion(content: Value) -> String {
        json!({"choices": [{"message": {"content": content.to_string()}}]}).to_string()
    }

    async fn three_companies(pool: &SqlitePool) -> (i64, i64, i64) {
        let a = seed_company(pool, "Alpha", "Technology", None, &[4.5]).await;
        let b = seed_company(pool, "Beta", "Technology", None, &[3.0]).await;
        let c = seed_company(pool, "Gamma", "Technology", None, &[4.0]).await;
        (a, b, c)
    }

    /// Expect model names to map back case-insensitively and unknown names dropped
    #[tokio::test]
    async fn test_recommend_with_model() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let (_, b, _) = three_companies(pool).await;

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(200)
            .with_body(completion(json!({"recommendations": [
                {"rank": 1, "name": "gamma", "matchReason": "Balanced", "keyStrengths": "WLB"},
                {"rank": 2, "name": "Nonexistent", "matchReason": "-", "keyStrengths": "-"},
                {"rank": 3, "name": "Beta", "matchReason": "Growing", "keyStrengths": "Pay"}
            ]})))
            .create_async()
            .await;

        let llm = LlmClient::new(server.url(), "k", "m".into(), 5).unwrap();
        let service = RecommendationService::new(pool, Some(&llm));
        let outcome = service
            .recommend(&PreferenceCriteria {
                preferred_location: Some("austin, tx".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        let RankingOutcome::Ai(picks) = outcome else {
            panic!("expected model ranking");
        };
        assert_eq!(picks.len(), 2);
        assert_eq!(picks[0].company.company.name, "Gamma");
        assert_eq!(picks[1].company.company.id, b);
        assert_eq!(picks[1].rank, 3);
    }

    /// Expect a failing model to fall back to score order
    #[tokio::test]
    async fn test_recommend_falls_back_on_model_error() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let (a, _, c) = three_companies(pool).await;

        let mut server = mockito::Server::new_async().await;
        server.mock("POST", "/").with_status(500).create_async().await;

        let llm = LlmClient::new(server.url(), "k", "m".into(), 5).unwrap();
        let service = RecommendationService::new(pool, Some(&llm));
        let outcome = service
            .recommend(&PreferenceCriteria {
                limit: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(!outcome.is_ai());
        let RankingOutcome::Heuristic(list) = outcome else {
            unreachable!()
        };
        let ids: Vec<i64> = list.iter().map(|s| s.company.id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[tokio::test]
    async fn test_recommend_filters_and_exclusions() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let (a, _, c) = three_companies(pool).await;

        let service = RecommendationService::new(pool, None);
        let outcome = service
            .recommend(&PreferenceCriteria {
                min_culture_score: Some(3.5),
                exclude_company_ids: vec![a],
                ..Default::default()
            })
            .await
            .unwrap();
        let RankingOutcome::Heuristic(list) = outcome else {
            panic!("no model configured");
        };
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].company.id, c);

        let none = service
            .recommend(&PreferenceCriteria {
                preferred_industry: Some("Mining".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_similar_ranks_by_rating_proximity() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let (a, b, c) = three_companies(pool).await;

        let service = RecommendationService::new(pool, None);
        let ranked = service.similar(a, 1).await.unwrap().unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].company.company.id, c);
        assert_eq!(ranked[0].similarity_score, 100);

        let all = service.similar(b, 10).await.unwrap().unwrap();
        assert!(all.iter().all(|s| s.company.company.id != b));
        assert!(service.similar(404, 3).await.unwrap().is_none());
    }

    /// Expect the heuristic list when the model returns unparseable output
    #[tokio::test]
    async fn test_similar_with_reasons_fallback_and_ai() {
        let db = seeded_pool().await;
        let pool = db.pool().unwrap();
        let (a, b, c) = three_companies(pool).await;

        let mut broken = mockito::Server::new_async().await;
        broken
            .mock("POST", "/")
            .with_status(200)
            .with_body(completion(json!("not the schema")))
            .create_async()
            .await;
        let llm = LlmClient::new(broken.url(), "k", "m".into(), 5).unwrap();
        let outcome = RecommendationService::new(pool, Some(&llm))
            .similar_with_reasons(a, 5)
            .await
            .unwrap()
            .unwrap();
        let RankingOutcome::Heuristic(list) = outcome else {
            panic!("expected fallback");
        };
        let ids: Vec<i64> = list.iter().map(|s| s.company.company.id).collect();
        assert_eq!(ids, vec![c, b]);

        let mut good = mockito::Server::new_async().await;
        good.mock("POST", "/")
            .with_status(200)
            .with_body(completion(json!({"similar_companies": [
                {"name": "Alpha", "similarity_reason": "itself"},
                {"name": "BETA", "similarity_reason": "Same market"}
            ]})))
            .create_async()
            .await;
        let llm = LlmClient::new(good.url(), "k", "m".into(), 5).unwrap();
        let outcome = RecommendationService::new(pool, Some(&llm))
            .similar_with_reasons(a, 5)
            .await
            .unwrap()
            .unwrap();
        let RankingOutcome::Ai(picks) = outcome else {
            panic!("expected model ranking");
        };
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].company.company.id, b);

        assert!(RecommendationService::new(pool, None)
            .similar_with_reasons(999, 5)
            .await
            .unwrap()
            .is_none());
    }
}
