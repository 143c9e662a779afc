// src/services/mod.rs
//! Request-level operations composed from repositories, scoring and the
//! outbound integrations. Handlers stay thin and call into these.

pub mod chatbot;
pub mod companies;
pub mod comparison;
pub mod glassdoor;
pub mod jobs;
pub mod news;
pub mod recommendations;
pub mod reviews;
pub mod salary;

pub use chatbot::ChatbotService;
pub use companies::CompanyService;
pub use comparison::ComparisonService;
pub use glassdoor::{FetchOutcome, GlassdoorService};
pub use jobs::JobService;
pub use news::NewsService;
pub use recommendations::{PreferenceCriteria, RecommendationService};
pub use reviews::ReviewService;
pub use salary::SalaryService;

use serde::Serialize;

/// Result of refreshing a cache from an external source. External failures
/// land here instead of surfacing as errors.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synced: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncOutcome {
    pub fn synced(count: usize) -> Self {
        Self {
            success: true,
            synced: Some(count),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            synced: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use sqlx::SqlitePool;

    use crate::database::{CompanyRepository, CultureScoreRepository, DatabaseConfig};
    use crate::types::{NewCompany, NewCultureScore};

    pub async fn seeded_pool() -> DatabaseConfig {
        DatabaseConfig::in_memory().await.unwrap()
    }

    /// Company in Austin, TX with one culture row per overall rating
    pub async fn seed_company(
        pool: &SqlitePool,
        name: &str,
        industry: &str,
        turnover_rate: Option<f64>,
        overalls: &[f64],
    ) -> i64 {
        let (company, _) = CompanyRepository::new(pool)
            .insert_or_get(&NewCompany {
                name: name.into(),
                industry: Some(industry.into()),
                size_range: Some("1001-5000".into()),
                headquarters_city: Some("Austin".into()),
                headquarters_state: Some("TX".into()),
                turnover_rate,
                ..Default::default()
            })
            .await
            .unwrap();

        let scores = CultureScoreRepository::new(pool);
        for (i, overall) in overalls.iter().enumerate() {
            scores
                .insert(&NewCultureScore {
                    company_id: company.id,
                    source: format!("source-{}", i),
                    overall_rating: Some(*overall),
                    work_life_balance: Some(4.0),
                    compensation_benefits: Some(3.5),
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        company.id
    }
}
