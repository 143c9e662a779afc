// src/database/glassdoor.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::{GlassdoorMetrics, InterviewRecord, NewGlassdoorMetrics, NewInterview};

const INTERVIEW_COLUMNS: &str = "id, company_id, external_id, job_title, interview_type, \
     difficulty, duration, questions, experience, outcome, interview_date, data_source, \
     cached_at, created_at";

const METRICS_COLUMNS: &str = "id, company_id, company_name, overall_rating, ceo_approval, \
     recommend_to_friend, salary_min, salary_max, salary_currency, review_count, \
     interview_count, last_synced_at, created_at, updated_at";

pub struct GlassdoorRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> GlassdoorRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn interviews_for_company(
        &self,
        company_id: i64,
        limit: i64,
    ) -> Result<Vec<InterviewRecord>> {
        let sql = format!(
            "SELECT {} FROM interview_data WHERE company_id = ? \
             ORDER BY interview_date DESC, id DESC LIMIT ?",
            INTERVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterviewRecord>(&sql)
            .bind(company_id)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn interviews_by_title(
        &self,
        company_id: i64,
        job_title: &str,
        limit: i64,
    ) -> Result<Vec<InterviewRecord>> {
        let sql = format!(
            "SELECT {} FROM interview_data WHERE company_id = ? AND job_title = ? \
             ORDER BY interview_date DESC, id DESC LIMIT ?",
            INTERVIEW_COLUMNS
        );
        let rows = sqlx::query_as::<_, InterviewRecord>(&sql)
            .bind(company_id)
            .bind(job_title)
            .bind(limit)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Insert or refresh an interview keyed by its external id
    pub async fn upsert_interview(&self, interview: &NewInterview) -> Result<()> {
        let now = Utc::now();
        let questions = serde_json::to_string(&interview.questions)?;

        sqlx::query(
            r#"
            INSERT INTO interview_data (company_id, external_id, job_title, interview_type,
                                        difficulty, duration, questions, experience, outcome,
                                        interview_date, data_source, cached_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 'Glassdoor', ?, ?)
            ON CONFLICT(external_id) DO UPDATE SET
                job_title = excluded.job_title,
                interview_type = excluded.interview_type,
                difficulty = excluded.difficulty,
                duration = excluded.duration,
                questions = excluded.questions,
                experience = excluded.experience,
                outcome = excluded.outcome,
                interview_date = excluded.interview_date,
                cached_at = excluded.cached_at
            "#,
        )
        .bind(interview.company_id)
        .bind(&interview.external_id)
        .bind(&interview.job_title)
        .bind(&interview.interview_type)
        .bind(&interview.difficulty)
        .bind(&interview.duration)
        .bind(questions)
        .bind(&interview.experience)
        .bind(&interview.outcome)
        .bind(interview.interview_date)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;
        Ok(())
    }

    pub async fn metrics_for_company(&self, company_id: i64) -> Result<Option<GlassdoorMetrics>> {
        let sql = format!(
            "SELECT {} FROM glassdoor_metrics WHERE company_id = ?",
            METRICS_COLUMNS
        );
        let row = sqlx::query_as::<_, GlassdoorMetrics>(&sql)
            .bind(company_id)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// One row per company; a sync replaces the figures and stamps the sync time
    pub async fn upsert_metrics(&self, metrics: &NewGlassdoorMetrics) -> Result<()> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO glassdoor_metrics (company_id, company_name, overall_rating, ceo_approval,
                                           recommend_to_friend, salary_min, salary_max,
                                           salary_currency, review_count, interview_count,
                                           last_synced_at, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, COALESCE(?, 'USD'), ?, ?, ?, ?, ?)
            ON CONFLICT(company_id) DO UPDATE SET
                company_name = excluded.company_name,
                overall_rating = excluded.overall_rating,
                ceo_approval = excluded.ceo_approval,
                recommend_to_friend = excluded.recommend_to_friend,
                salary_min = excluded.salary_min,
                salary_max = excluded.salary_max,
                salary_currency = excluded.salary_currency,
                review_count = excluded.review_count,
                interview_count = excluded.interview_count,
                last_synced_at = excluded.last_synced_at,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(metrics.company_id)
        .bind(&metrics.company_name)
        .bind(metrics.overall_rating)
        .bind(metrics.ceo_approval)
        .bind(metrics.recommend_to_friend)
        .bind(metrics.salary_min)
        .bind(metrics.salary_max)
        .bind(&metrics.salary_currency)
        .bind(metrics.review_count)
        .bind(metrics.interview_count)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;

    fn interview(external_id: &str, title: &str) -> NewInterview {
        NewInterview {
            company_id: 4,
            external_id: Some(external_id.into()),
            job_title: title.into(),
            questions: vec!["Design a cache".into()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_interview_upsert_by_external_id() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = GlassdoorRepository::new(db.pool().unwrap());

        repo.upsert_interview(&interview("gd-1", "Engineer")).await.unwrap();
        let mut updated = interview("gd-1", "Engineer");
        updated.outcome = Some("Accepted Offer".into());
        repo.upsert_interview(&updated).await.unwrap();
        repo.upsert_interview(&interview("gd-2", "Designer")).await.unwrap();

        let all = repo.interviews_for_company(4, 20).await.unwrap();
        assert_eq!(all.len(), 2);

        let engineers = repo.interviews_by_title(4, "Engineer", 10).await.unwrap();
        assert_eq!(engineers.len(), 1);
        assert_eq!(engineers[0].outcome.as_deref(), Some("Accepted Offer"));
        assert_eq!(engineers[0].data_source, "Glassdoor");
        assert_eq!(
            engineers[0].questions.as_deref(),
            Some(r#"["Design a cache"]"#)
        );
    }

    #[tokio::test]
    async fn test_metrics_upsert_keeps_one_row() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = GlassdoorRepository::new(db.pool().unwrap());

        let mut metrics = NewGlassdoorMetrics {
            company_id: 4,
            company_name: "Acme".into(),
            overall_rating: Some(3.9),
            ..Default::default()
        };
        repo.upsert_metrics(&metrics).await.unwrap();
        metrics.overall_rating = Some(4.1);
        metrics.interview_count = 12;
        repo.upsert_metrics(&metrics).await.unwrap();

        let stored = repo.metrics_for_company(4).await.unwrap().unwrap();
        assert_eq!(stored.overall_rating, Some(4.1));
        assert_eq!(stored.interview_count, 12);
        assert_eq!(stored.salary_currency, "USD");
        assert!(stored.last_synced_at.is_some());
        assert!(repo.metrics_for_company(5).await.unwrap().is_none());
    }
}
