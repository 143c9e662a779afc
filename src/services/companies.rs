// src/services/companies.rs
use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::{CompanyRepository, CultureScoreRepository, ReviewRepository};
use crate::scoring::{self, FilterCriteria, ScoreIndex};
use crate::types::{AggregateScore, Company, CompanyDetail, ScoredCompany};

/// Company reads that carry computed aggregates
pub struct CompanyService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Every culture row, grouped once so each aggregate is a map lookup
    async fn score_index(&self) -> Result<ScoreIndex> {
        let rows = CultureScoreRepository::new(self.pool).all().await?;
        Ok(scoring::group_by_company(rows))
    }

    fn attach(companies: Vec<Company>, index: &ScoreIndex) -> Vec<ScoredCompany> {
        companies
            .into_iter()
            .map(|company| {
                let aggregate_score = scoring::aggregate_for(&company, index);
                ScoredCompany {
                    company,
                    aggregate_score,
                }
            })
            .collect()
    }

    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ScoredCompany>> {
        let companies = CompanyRepository::new(self.pool).list(limit, offset).await?;
        let index = self.score_index().await?;
        Ok(Self::attach(companies, &index))
    }

    pub async fn all_scored(&self) -> Result<Vec<ScoredCompany>> {
        let companies = CompanyRepository::new(self.pool).all().await?;
        let index = self.score_index().await?;
        Ok(Self::attach(companies, &index))
    }

    pub async fn scored(&self, company_id: i64) -> Result<Option<ScoredCompany>> {
        let Some(company) = CompanyRepository::new(self.pool).find_by_id(company_id).await? else {
            return Ok(None);
        };
        let rows = CultureScoreRepository::new(self.pool)
            .for_company(company_id)
            .await?;
        let aggregate_score = scoring::aggregate(&rows, company.turnover_rate);
        Ok(Some(ScoredCompany {
            company,
            aggregate_score,
        }))
    }

    /// `None` for an unknown company or one without culture rows
    pub async fn aggregate(&self, company_id: i64) -> Result<Option<AggregateScore>> {
        Ok(self
            .scored(company_id)
            .await?
            .and_then(|scored| scored.aggregate_score))
    }

    pub async fn detail(&self, company_id: i64) -> Result<Option<CompanyDetail>> {
        let companies = CompanyRepository::new(self.pool);
        let Some(company) = companies.find_by_id(company_id).await? else {
            return Ok(None);
        };

        let scores = CultureScoreRepository::new(self.pool);
        let reviews = ReviewRepository::new(self.pool);
        let (scores, trends, layoffs, sourced_reviews) = tokio::try_join!(
            scores.for_company(company_id),
            companies.trends_for(company_id),
            companies.layoffs_for(company_id),
            reviews.sourced_for_company(company_id),
        )?;

        Ok(Some(CompanyDetail {
            company,
            scores,
            trends,
            layoffs,
            sourced_reviews,
        }))
    }

    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Company>> {
        let companies = CompanyRepository::new(self.pool).all().await?;
        Ok(scoring::search(companies, query, limit))
    }

    pub async fn filter(&self, criteria: &FilterCriteria) -> Result<Vec<ScoredCompany>> {
        let companies = CompanyRepository::new(self.pool).all().await?;
        let index = self.score_index().await?;
        Ok(criteria.apply(companies, |company| scoring::aggregate_for(company, &index)))
    }
}
