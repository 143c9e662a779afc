// src/types/ranking.rs
use serde::Serialize;

use super::ScoredCompany;

/// Result of a ranking that may come from the language model or from the
/// deterministic fallback. Serialized as `{"strategy": "ai"|"heuristic", "results": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", content = "results", rename_all = "lowercase")]
pub enum RankingOutcome<A, H> {
    Ai(Vec<A>),
    Heuristic(Vec<H>),
}

impl<A, H> RankingOutcome<A, H> {
    pub fn is_ai(&self) -> bool {
        matches!(self, RankingOutcome::Ai(_))
    }

    pub fn len(&self) -> usize {
        match self {
            RankingOutcome::Ai(items) => items.len(),
            RankingOutcome::Heuristic(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Heuristically ranked neighbour, score in 0..=100
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarCompany {
    #[serde(flatten)]
    pub company: ScoredCompany,
    pub similarity_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSimilarCompany {
    #[serde(flatten)]
    pub company: ScoredCompany,
    pub similarity_reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    #[serde(flatten)]
    pub company: ScoredCompany,
    pub rank: u32,
    pub match_reason: String,
    pub key_strengths: String,
}
