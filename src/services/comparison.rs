// src/services/comparison.rs
//! Side-by-side company comparison
use anyhow::Result;
use serde::Serialize;
use sqlx::SqlitePool;

use super::CompanyService;
use crate::database::{CompanyRepository, JobRepository, NewsRepository, SalaryRepository};
use crate::types::salary::SalaryCompareFilter;
use crate::types::{AggregateScore, Company, CompanyNews, JobOpening, SalaryRecord};

const RECENT_NEWS: i64 = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    pub company: Company,
    pub aggregate_score: Option<AggregateScore>,
    pub salary_data: Vec<SalaryRecord>,
    pub job_openings: Vec<JobOpening>,
    pub recent_news: Vec<CompanyNews>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub location: String,
    pub size: Option<String>,
    #[serde(flatten)]
    pub metrics: AggregateScore,
}

pub struct ComparisonService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ComparisonService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Per company the four reads run concurrently; any failure aborts the call
    pub async fn comparison_data(&self, company_ids: &[i64]) -> Result<Vec<ComparisonData>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let companies = CompanyRepository::new(self.pool).find_by_ids(company_ids).await?;
        let scores = CompanyService::new(self.pool);
        let salaries = SalaryRepository::new(self.pool);
        let jobs = JobRepository::new(self.pool);
        let news = NewsRepository::new(self.pool);

        let mut data = Vec::with_capacity(companies.len());
        for company in companies {
            let (aggregate_score, salary_data, job_openings, recent_news) = tokio::try_join!(
                scores.aggregate(company.id),
                salaries.for_company(company.id),
                jobs.for_company(company.id),
                news.for_company(company.id, RECENT_NEWS),
            )?;
            data.push(ComparisonData {
                company,
                aggregate_score,
                salary_data,
                job_openings,
                recent_news,
            });
        }
        Ok(data)
    }

    pub async fn metrics_summary(&self, company_ids: &[i64]) -> Result<Vec<MetricsSummary>> {
        let companies = CompanyRepository::new(self.pool).find_by_ids(company_ids).await?;
        let scores = CompanyService::new(self.pool);

        let mut summaries = Vec::with_capacity(companies.len());
        for company in companies {
            let metrics = scores.aggregate(company.id).await?.unwrap_or_default();
            summaries.push(MetricsSummary {
                id: company.id,
                location: company.location(),
                name: company.name,
                industry: company.industry,
                size: company.size_range,
                metrics,
            });
        }
        Ok(summaries)
    }

    pub async fn salary_comparison(
        &self,
        company_ids: Vec<i64>,
        job_title: String,
        level: String,
    ) -> Result<Vec<SalaryRecord>> {
        let filter = SalaryCompareFilter {
            job_title: Some(job_title),
            level: Some(level),
            company_ids: Some(company_ids),
        };
        SalaryRepository::new(self.pool).compare(&filter).await
    }
}
