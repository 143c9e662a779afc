// src/services/salary.rs
use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::SalaryRepository;
use crate::scoring::salary as salary_math;
use crate::types::salary::{
    SalaryCompareFilter, SalaryInsights, SalaryRange, SalaryStats, SalaryTrendFilter,
};
use crate::types::SalaryRecord;

pub struct SalaryService<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SalaryService<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    fn repository(&self) -> SalaryRepository<'a> {
        SalaryRepository::new(self.pool)
    }

    pub async fn by_company(&self, company_id: i64) -> Result<Vec<SalaryRecord>> {
        self.repository().for_company(company_id).await
    }

    pub async fn compare(&self, filter: &SalaryCompareFilter) -> Result<Vec<SalaryRecord>> {
        self.repository().compare(filter).await
    }

    /// Total compensation distribution for one role and level
    pub async fn stats(&self, job_title: &str, level: &str) -> Result<Option<SalaryStats>> {
        let filter = SalaryCompareFilter {
            job_title: Some(job_title.to_string()),
            level: Some(level.to_string()),
            company_ids: None,
        };
        let records = self.repository().compare(&filter).await?;
        Ok(salary_math::compensation_stats(&records))
    }

    pub async fn job_titles(&self) -> Result<Vec<String>> {
        self.repository().distinct_job_titles().await
    }

    pub async fn levels(&self) -> Result<Vec<String>> {
        self.repository().distinct_levels().await
    }

    pub async fn trends(&self, filter: &SalaryTrendFilter) -> Result<SalaryInsights> {
        let records = self.repository().all().await?;
        Ok(salary_math::insights(&records, filter))
    }

    pub async fn range_by_role(&self, job_title: &str) -> Result<SalaryRange> {
        let records = self.repository().all().await?;
        Ok(salary_math::range_by_role(&records, job_title))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use crate::types::NewSalaryRecord;

    async fn seed(pool: &SqlitePool) {
        let repo = SalaryRepository::new(pool);
        for (title, level, base, total) in [
            ("Software Engineer", "Senior", 150000.0, 200000.0),
            ("Software Engineer", "Senior", 170000.0, 240000.0),
            ("Software Engineer", "Junior", 95000.0, 110000.0),
            ("Product Manager", "Senior", 160000.0, 210000.0),
        ] {
            repo.insert(&NewSalaryRecord {
                company_id: 1,
                job_title: title.into(),
                level: Some(level.into()),
                base_salary: base,
                total_compensation: total,
                currency: "USD".into(),
                ..Default::default()
            })
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn test_stats_and_lists() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let pool = db.pool().unwrap();
        seed(pool).await;
        let service = SalaryService::new(pool);

        let stats = service.stats("Software Engineer", "Senior").await.unwrap().unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.min, 200000.0);
        assert_eq!(stats.max, 240000.0);
        assert!(service.stats("Chef", "Senior").await.unwrap().is_none());

        assert_eq!(
            service.job_titles().await.unwrap(),
            vec!["Product Manager".to_string(), "Software Engineer".to_string()]
        );
        assert_eq!(
            service.levels().await.unwrap(),
            vec!["Junior".to_string(), "Senior".to_string()]
        );
    }

    #[tokio::test]
    async fn test_trends_and_range() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let pool = db.pool().unwrap();
        seed(pool).await;
        let service = SalaryService::new(pool);

        let insights = service
            .trends(&SalaryTrendFilter {
                job_title: Some("engineer".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(insights.trends.len(), 2);
        assert_eq!(insights.trends[0].level, "Senior");

        let range = service.range_by_role("software").await.unwrap();
        assert_eq!(range.count, 3);
        assert_eq!(range.min, 95000.0);
        assert_eq!(range.max, 170000.0);
    }
}
