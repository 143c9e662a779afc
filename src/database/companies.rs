// src/database/companies.rs
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::app_log;
use crate::types::{Company, CultureTrend, LayoffEvent, NewCompany};

const COMPANY_COLUMNS: &str = "id, name, domain, industry, size_range, headquarters_city, \
     headquarters_state, headquarters_country, logo_url, website, turnover_rate, avg_tenure, \
     created_at, updated_at";

/// Turnover coverage across all companies
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct TurnoverSummary {
    pub with_turnover: i64,
    pub min_rate: Option<f64>,
    pub max_rate: Option<f64>,
}

pub struct CompanyRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CompanyRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Page of companies in id order
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Company>> {
        let sql = format!(
            "SELECT {} FROM companies ORDER BY id ASC LIMIT ? OFFSET ?",
            COMPANY_COLUMNS
        );
        let companies = sqlx::query_as::<_, Company>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(self.pool)
            .await?;
        Ok(companies)
    }

    /// Full company set, as the in-memory filter and ranker need it
    pub async fn all(&self) -> Result<Vec<Company>> {
        let sql = format!("SELECT {} FROM companies ORDER BY id ASC", COMPANY_COLUMNS);
        let companies = sqlx::query_as::<_, Company>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(companies)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Company>> {
        let sql = format!("SELECT {} FROM companies WHERE id = ?", COMPANY_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(company)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Company>> {
        let sql = format!("SELECT {} FROM companies WHERE name = ?", COMPANY_COLUMNS);
        let company = sqlx::query_as::<_, Company>(&sql)
            .bind(name)
            .fetch_optional(self.pool)
            .await?;
        Ok(company)
    }

    /// Companies with the given ids, in the order the ids were given
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Company>> {
        let mut companies = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(company) = self.find_by_id(*id).await? {
                companies.push(company);
            }
        }
        Ok(companies)
    }

    /// Insert a company unless one with the same name exists.
    /// Returns the stored row and whether it was created.
    pub async fn insert_or_get(&self, company: &NewCompany) -> Result<(Company, bool)> {
        if let Some(existing) = self.find_by_name(&company.name).await? {
            return Ok((existing, false));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO companies (name, domain, industry, size_range, headquarters_city,
                                   headquarters_state, headquarters_country, logo_url, website,
                                   turnover_rate, avg_tenure, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&company.name)
        .bind(&company.domain)
        .bind(&company.industry)
        .bind(&company.size_range)
        .bind(&company.headquarters_city)
        .bind(&company.headquarters_state)
        .bind(&company.headquarters_country)
        .bind(&company.logo_url)
        .bind(&company.website)
        .bind(company.turnover_rate)
        .bind(company.avg_tenure)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await
        .with_context(|| format!("Failed to insert company {}", company.name))?;

        let id = result.last_insert_rowid();
        let stored = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Company {} missing after insert", id))?;

        app_log!(info, "Created company: {} (id {})", stored.name, stored.id);
        Ok((stored, true))
    }

    /// Bulk turnover backfill by exact company name
    pub async fn update_turnover(
        &self,
        name: &str,
        turnover_rate: f64,
        avg_tenure: Option<f64>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET turnover_rate = ?, avg_tenure = COALESCE(?, avg_tenure), updated_at = ?
            WHERE name = ?
            "#,
        )
        .bind(turnover_rate)
        .bind(avg_tenure)
        .bind(Utc::now())
        .bind(name)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn turnover_summary(&self) -> Result<TurnoverSummary> {
        let summary = sqlx::query_as::<_, TurnoverSummary>(
            r#"
            SELECT COUNT(turnover_rate) AS with_turnover,
                   MIN(turnover_rate) AS min_rate,
                   MAX(turnover_rate) AS max_rate
            FROM companies
            "#,
        )
        .fetch_one(self.pool)
        .await?;
        Ok(summary)
    }

    /// Distinct non-empty industries, alphabetically
    pub async fn industries(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT industry FROM companies
            WHERE industry IS NOT NULL AND industry != ''
            ORDER BY industry ASC
            "#,
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(industry,)| industry).collect())
    }

    pub async fn trends_for(&self, company_id: i64) -> Result<Vec<CultureTrend>> {
        let trends = sqlx::query_as::<_, CultureTrend>(
            r#"
            SELECT id, company_id, metric_name, metric_value, month_year, source, created_at
            FROM culture_trends
            WHERE company_id = ?
            ORDER BY month_year ASC, metric_name ASC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(trends)
    }

    pub async fn add_trend(
        &self,
        company_id: i64,
        metric_name: &str,
        metric_value: f64,
        month_year: &str,
        source: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO culture_trends (company_id, metric_name, metric_value, month_year, source, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(company_id)
        .bind(metric_name)
        .bind(metric_value)
        .bind(month_year)
        .bind(source)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;
        Ok(())
    }

    /// Layoff history, most recent first
    pub async fn layoffs_for(&self, company_id: i64) -> Result<Vec<LayoffEvent>> {
        let layoffs = sqlx::query_as::<_, LayoffEvent>(
            r#"
            SELECT id, company_id, date, employees_affected, percentage_of_workforce,
                   source_url, notes, created_at
            FROM layoff_events
            WHERE company_id = ?
            ORDER BY date DESC
            "#,
        )
        .bind(company_id)
        .fetch_all(self.pool)
        .await?;
        Ok(layoffs)
    }

    pub async fn add_layoff(
        &self,
        company_id: i64,
        date: NaiveDate,
        employees_affected: Option<i64>,
        percentage_of_workforce: Option<f64>,
        source_url: Option<&str>,
        notes: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO layoff_events (company_id, date, employees_affected,
                                       percentage_of_workforce, source_url, notes, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(company_id)
        .bind(date)
        .bind(employees_affected)
        .bind(percentage_of_workforce)
        .bind(source_url)
        .bind(notes)
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

    fn acme() -> NewCompany {
        NewCompany {
            name: "Acme".into(),
            industry: Some("Technology".into()),
            headquarters_city: Some("Austin".into()),
            headquarters_state: Some("TX".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_insert_or_get_reuses_existing_name() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = CompanyRepository::new(db.pool().unwrap());

        let (first, created) = repo.insert_or_get(&acme()).await.unwrap();
        assert!(created);
        let (second, created_again) = repo.insert_or_get(&acme()).await.unwrap();
        assert!(!created_again);
        assert_eq!(first.id, second.id);
        assert_eq!(repo.all().await.unwrap().len(), 1);
        assert_eq!(first.location(), "Austin, TX");
    }

    #[tokio::test]
    async fn test_find_by_ids_preserves_order_and_skips_missing() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = CompanyRepository::new(db.pool().unwrap());
        let (a, _) = repo.insert_or_get(&acme()).await.unwrap();
        let (b, _) = repo
            .insert_or_get(&NewCompany {
                name: "Bolt".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        let found = repo.find_by_ids(&[b.id, 999, a.id]).await.unwrap();
        let names: Vec<&str> = found.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bolt", "Acme"]);
    }

    #[tokio::test]
    async fn test_turnover_backfill_and_summary() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = CompanyRepository::new(db.pool().unwrap());
        repo.insert_or_get(&acme()).await.unwrap();

        assert!(repo.update_turnover("Acme", 12.5, Some(3.1)).await.unwrap());
        assert!(!repo.update_turnover("Nobody", 10.0, None).await.unwrap());

        let summary = repo.turnover_summary().await.unwrap();
        assert_eq!(summary.with_turnover, 1);
        assert_eq!(summary.min_rate, Some(12.5));
        assert_eq!(summary.max_rate, Some(12.5));

        let stored = repo.find_by_name("Acme").await.unwrap().unwrap();
        assert_eq!(stored.avg_tenure, Some(3.1));
    }

    #[tokio::test]
    async fn test_trends_and_layoffs() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = CompanyRepository::new(db.pool().unwrap());
        let (company, _) = repo.insert_or_get(&acme()).await.unwrap();

        repo.add_trend(company.id, "overall_rating", 4.1, "2024-02", Some("glassdoor"))
            .await
            .unwrap();
        repo.add_trend(company.id, "overall_rating", 4.0, "2024-01", Some("glassdoor"))
            .await
            .unwrap();
        let trends = repo.trends_for(company.id).await.unwrap();
        assert_eq!(trends[0].month_year, "2024-01");

        let early = NaiveDate::from_ymd_opt(2023, 1, 10).unwrap();
        let late = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        repo.add_layoff(company.id, early, Some(100), None, None, None)
            .await
            .unwrap();
        repo.add_layoff(company.id, late, None, Some(5.0), None, Some("restructuring"))
            .await
            .unwrap();
        let layoffs = repo.layoffs_for(company.id).await.unwrap();
        assert_eq!(layoffs[0].date, late);
        assert_eq!(repo.industries().await.unwrap(), vec!["Technology"]);
    }
}
