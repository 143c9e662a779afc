// src/database/listings.rs
//! Job openings and news caches, both refreshed with upsert semantics
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::{CompanyNews, JobOpening, NewCompanyNews, NewJobOpening};

const NEWS_COLUMNS: &str = "id, company_id, industry_category, headline, summary, full_content, \
     source_url, source_name, published_date, sentiment, relevance_score, created_at";

pub struct JobRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> JobRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Most recently posted first
    pub async fn for_company(&self, company_id: i64) -> Result<Vec<JobOpening>> {
        let jobs = sqlx::query_as::<_, JobOpening>(
            r#"
            SELECT id, company_id, job_title, job_description, location, job_type,
                   salary_min, salary_max, currency, posted_date, external_url, source, created_at
            FROM job_openings
            WHERE company_id = ?
            ORDER BY posted_date DESC, id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(jobs)
    }

    /// Insert or refresh a posting keyed by (company, external url)
    pub async fn upsert(&self, job: &NewJobOpening) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO job_openings (company_id, job_title, job_description, location, job_type,
                                      salary_min, salary_max, currency, posted_date,
                                      external_url, source, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, 'USD'), ?, ?, ?, ?)
            ON CONFLICT(company_id, external_url) DO UPDATE SET
                job_title = excluded.job_title,
                job_description = excluded.job_description,
                location = excluded.location,
                job_type = excluded.job_type,
                salary_min = excluded.salary_min,
                salary_max = excluded.salary_max,
                currency = excluded.currency,
                posted_date = excluded.posted_date,
                source = excluded.source
            "#,
        )
        .bind(job.company_id)
        .bind(&job.job_title)
        .bind(&job.job_description)
        .bind(&job.location)
        .bind(&job.job_type)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(&job.currency)
        .bind(job.posted_date)
        .bind(&job.external_url)
        .bind(&job.source)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

pub struct NewsRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NewsRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn for_company(&self, company_id: i64, limit: i64) -> Result<Vec<CompanyNews>> {
        let sql = format!(
            "SELECT {} FROM company_news WHERE company_id = ? \
             ORDER BY published_date DESC, id DESC LIMIT ?",
            NEWS_COLUMNS
        );
        let news = sqlx::query_as::<_, CompanyNews>(&sql)
            .bind(company_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(news)
    }

    pub async fn for_industry(&self, category: &str, limit: i64) -> Result<Vec<CompanyNews>> {
        let sql = format!(
            "SELECT {} FROM company_news WHERE industry_category = ? \
             ORDER BY published_date DESC, id DESC LIMIT ?",
            NEWS_COLUMNS
        );
        let news = sqlx::query_as::<_, CompanyNews>(&sql)
            .bind(category)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(news)
    }

    /// Insert or refresh an item keyed by (company, source url).
    /// Items without a url never conflict and are always appended.
    pub async fn upsert(&self, item: &NewCompanyNews) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO company_news (company_id, industry_category, headline, summary,
                                      full_content, source_url, source_name, published_date,
                                      sentiment, relevance_score, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(company_id, source_url) DO UPDATE SET
                headline = excluded.headline,
                summary = excluded.summary,
                full_content = excluded.full_content,
                source_name = excluded.source_name,
                published_date = excluded.published_date,
                sentiment = excluded.sentiment,
                relevance_score = excluded.relevance_score
            "#,
        )
        .bind(item.company_id)
        .bind(&item.industry_category)
        .bind(&item.headline)
        .bind(&item.summary)
        .bind(&item.full_content)
        .bind(&item.source_url)
        .bind(&item.source_name)
        .bind(item.published_date)
        .bind(&item.sentiment)
        .bind(item.relevance_score)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use chrono::{Duration, NaiveDate};

    #[tokio::test]
    async fn test_job_upsert_by_external_url() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = JobRepository::new(db.pool().unwrap());

        let mut job = NewJobOpening {
            company_id: 1,
            job_title: "Engineer".into(),
            external_url: Some("https://jobs.example.com/1".into()),
            posted_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        repo.upsert(&job).await.unwrap();
        job.job_title = "Senior Engineer".into();
        repo.upsert(&job).await.unwrap();

        repo.upsert(&NewJobOpening {
            company_id: 1,
            job_title: "Designer".into(),
            external_url: Some("https://jobs.example.com/2".into()),
            posted_date: NaiveDate::from_ymd_opt(2024, 4, 1),
            ..Default::default()
        })
        .await
        .unwrap();

        let jobs = repo.for_company(1).await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].job_title, "Designer");
        assert_eq!(jobs[1].job_title, "Senior Engineer");
        assert_eq!(jobs[1].currency, "USD");
    }

    #[tokio::test]
    async fn test_news_ordering_and_industry() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = NewsRepository::new(db.pool().unwrap());
        let now = Utc::now();

        for (offset, headline) in [(2, "older"), (0, "newest"), (1, "middle")] {
            repo.upsert(&NewCompanyNews {
                company_id: Some(7),
                headline: headline.into(),
                source_url: Some(format!("https://news.example.com/{}", headline)),
                published_date: Some(now - Duration::days(offset)),
                ..Default::default()
            })
            .await
            .unwrap();
        }
        repo.upsert(&NewCompanyNews {
            industry_category: Some("Technology".into()),
            headline: "Sector update".into(),
            ..Default::default()
        })
        .await
        .unwrap();

        let news = repo.for_company(7, 2).await.unwrap();
        let headlines: Vec<&str> = news.iter().map(|n| n.headline.as_str()).collect();
        assert_eq!(headlines, vec!["newest", "middle"]);

        let sector = repo.for_industry("Technology", 10).await.unwrap();
        assert_eq!(sector.len(), 1);
        assert_eq!(sector[0].company_id, None);
    }
}
