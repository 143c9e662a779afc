// src/database/reviews.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::{AnonymousReview, CompanyReview, NewReview};

const REVIEW_COLUMNS: &str = "id, company_id, rating, title, review_text, pros, cons, job_title, \
     employment_status, work_life_balance, compensation_benefits, career_opportunities, \
     culture_values, senior_management, is_helpful, is_flagged, created_at";

pub struct ReviewRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ReviewRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Append an anonymous review; the caller has validated it
    pub async fn insert(&self, review: &NewReview) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO anonymous_reviews (company_id, rating, title, review_text, pros, cons,
                                           job_title, employment_status, work_life_balance,
                                           compensation_benefits, career_opportunities,
                                           culture_values, senior_management, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(review.company_id)
        .bind(review.rating)
        .bind(&review.title)
        .bind(&review.review_text)
        .bind(&review.pros)
        .bind(&review.cons)
        .bind(&review.job_title)
        .bind(review.employment_status.map(|status| status.as_str()))
        .bind(review.work_life_balance)
        .bind(review.compensation_benefits)
        .bind(review.career_opportunities)
        .bind(review.culture_values)
        .bind(review.senior_management)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Newest first
    pub async fn page_for_company(
        &self,
        company_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AnonymousReview>> {
        let sql = format!(
            "SELECT {} FROM anonymous_reviews WHERE company_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            REVIEW_COLUMNS
        );
        let reviews = sqlx::query_as::<_, AnonymousReview>(&sql)
            .bind(company_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(reviews)
    }

    pub async fn all_for_company(&self, company_id: i64) -> Result<Vec<AnonymousReview>> {
        let sql = format!(
            "SELECT {} FROM anonymous_reviews WHERE company_id = ? ORDER BY id ASC",
            REVIEW_COLUMNS
        );
        let reviews = sqlx::query_as::<_, AnonymousReview>(&sql)
            .bind(company_id)
            .fetch_all(self.pool)
            .await?;
        Ok(reviews)
    }

    pub async fn flag(&self, review_id: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE anonymous_reviews SET is_flagged = TRUE WHERE id = ?")
            .bind(review_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reviews collected from external sources, newest first
    pub async fn sourced_for_company(&self, company_id: i64) -> Result<Vec<CompanyReview>> {
        let reviews = sqlx::query_as::<_, CompanyReview>(
            r#"
            SELECT id, company_id, source, rating, title, review_text, pros, cons,
                   sentiment_score, review_date, job_title, employment_status, created_at
            FROM company_reviews
            WHERE company_id = ?
            ORDER BY review_date DESC, id DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;
    use crate::types::EmploymentStatus;

    fn review(company_id: i64, rating: f64, title: &str) -> NewReview {
        NewReview {
            company_id,
            rating,
            title: Some(title.into()),
            review_text: None,
            pros: None,
            cons: None,
            job_title: None,
            employment_status: Some(EmploymentStatus::Former),
            work_life_balance: None,
            compensation_benefits: None,
            career_opportunities: None,
            culture_values: None,
            senior_management: None,
        }
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = ReviewRepository::new(db.pool().unwrap());
        repo.insert(&review(1, 4.0, "first")).await.unwrap();
        repo.insert(&review(1, 3.0, "second")).await.unwrap();
        repo.insert(&review(2, 5.0, "elsewhere")).await.unwrap();

        let page = repo.page_for_company(1, 20, 0).await.unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].title.as_deref(), Some("second"));
        assert_eq!(page[0].employment_status.as_deref(), Some("former"));
        assert!(!page[0].is_flagged);

        let offset = repo.page_for_company(1, 20, 1).await.unwrap();
        assert_eq!(offset[0].title.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_flag() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = ReviewRepository::new(db.pool().unwrap());
        let id = repo.insert(&review(1, 4.0, "x")).await.unwrap();

        assert!(repo.flag(id).await.unwrap());
        assert!(!repo.flag(id + 100).await.unwrap());
        assert!(repo.all_for_company(1).await.unwrap()[0].is_flagged);
    }
}
