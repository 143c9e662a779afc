// src/database/favorites.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::Company;

pub struct FavoriteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FavoriteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Favorite companies of a user, most recently saved first
    pub async fn companies_for_user(&self, user_id: i64) -> Result<Vec<Company>> {
        let companies = sqlx::query_as::<_, Company>(
            r#"
            SELECT c.id, c.name, c.domain, c.industry, c.size_range, c.headquarters_city,
                   c.headquarters_state, c.headquarters_country, c.logo_url, c.website,
                   c.turnover_rate, c.avg_tenure, c.created_at, c.updated_at
            FROM user_favorites f
            JOIN companies c ON c.id = f.company_id
            WHERE f.user_id = ?
            ORDER BY f.saved_at DESC, f.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(companies)
    }

    /// No-op when the favorite already exists
    pub async fn add(&self, user_id: i64, company_id: i64) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_favorites (user_id, company_id, saved_at)
            VALUES (?, ?, ?)
            ON CONFLICT(user_id, company_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(company_id)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, user_id: i64, company_id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = ? AND company_id = ?")
            .bind(user_id)
            .bind(company_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, user_id: i64, company_id: i64) -> Result<bool> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM user_favorites WHERE user_id = ? AND company_id = ?")
                .bind(user_id)
                .bind(company_id)
                .fetch_optional(self.pool)
                .await?;
        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{CompanyRepository, DatabaseConfig};
    use crate::types::NewCompany;

    #[tokio::test]
    async fn test_add_is_idempotent_and_scoped_to_user() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let pool = db.pool().unwrap();
        let (company, _) = CompanyRepository::new(pool)
            .insert_or_get(&NewCompany {
                name: "Acme".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let repo = FavoriteRepository::new(pool);
        repo.add(1, company.id).await.unwrap();
        repo.add(1, company.id).await.unwrap();

        assert_eq!(repo.companies_for_user(1).await.unwrap().len(), 1);
        assert!(repo.exists(1, company.id).await.unwrap());
        assert!(!repo.exists(2, company.id).await.unwrap());

        assert!(!repo.remove(2, company.id).await.unwrap());
        assert!(repo.remove(1, company.id).await.unwrap());
        assert!(repo.companies_for_user(1).await.unwrap().is_empty());
    }
}
