// src/database/scores.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::{CultureScore, NewCultureScore};

const SCORE_COLUMNS: &str = "id, company_id, source, overall_rating, work_life_balance, \
     compensation_benefits, career_opportunities, culture_values, senior_management, \
     ceo_approval, recommend_to_friend, review_count, date_collected, created_at";

pub struct CultureScoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CultureScoreRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn for_company(&self, company_id: i64) -> Result<Vec<CultureScore>> {
        let sql = format!(
            "SELECT {} FROM culture_scores WHERE company_id = ? ORDER BY id ASC",
            SCORE_COLUMNS
        );
        let rows = sqlx::query_as::<_, CultureScore>(&sql)
            .bind(company_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Every score row, for building an in-memory index in one query
    pub async fn all(&self) -> Result<Vec<CultureScore>> {
        let sql = format!("SELECT {} FROM culture_scores ORDER BY id ASC", SCORE_COLUMNS);
        let rows = sqlx::query_as::<_, CultureScore>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Rows are never updated; every collection run inserts fresh ones
    pub async fn insert(&self, score: &NewCultureScore) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO culture_scores (company_id, source, overall_rating, work_life_balance,
                                        compensation_benefits, career_opportunities, culture_values,
                                        senior_management, ceo_approval, recommend_to_friend,
                                        review_count, date_collected, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(score.company_id)
        .bind(&score.source)
        .bind(score.overall_rating)
        .bind(score.work_life_balance)
        .bind(score.compensation_benefits)
        .bind(score.career_opportunities)
        .bind(score.culture_values)
        .bind(score.senior_management)
        .bind(score.ceo_approval)
        .bind(score.recommend_to_friend)
        .bind(score.review_count)
        .bind(score.date_collected)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;

    #[tokio::test]
    async fn test_insert_and_read_back() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = CultureScoreRepository::new(db.pool().unwrap());

        for (company_id, source, overall) in [(1, "glassdoor", 4.0), (1, "indeed", 4.2), (2, "glassdoor", 3.0)] {
            repo.insert(&NewCultureScore {
                company_id,
                source: source.into(),
                overall_rating: Some(overall),
                ..Default::default()
            })
            .await
            .unwrap();
        }

        let rows = repo.for_company(1).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].source, "indeed");
        assert_eq!(rows[0].work_life_balance, None);
        assert_eq!(repo.all().await.unwrap().len(), 3);
    }
}
