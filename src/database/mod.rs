// src/database/mod.rs
use anyhow::{Context, Result};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::path::PathBuf;

use crate::app_log;

pub mod companies;
pub mod comparisons;
pub mod favorites;
pub mod glassdoor;
pub mod listings;
pub mod reviews;
pub mod salary;
pub mod scores;
pub mod users;

pub use companies::CompanyRepository;
pub use comparisons::ComparisonRepository;
pub use favorites::FavoriteRepository;
pub use glassdoor::GlassdoorRepository;
pub use listings::{JobRepository, NewsRepository};
pub use reviews::ReviewRepository;
pub use salary::SalaryRepository;
pub use scores::CultureScoreRepository;
pub use users::{SessionIdentity, UserRepository};

/// Schema statements, applied in order; every one is idempotent
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        open_id TEXT NOT NULL UNIQUE,
        name TEXT,
        email TEXT,
        login_method TEXT,
        role TEXT NOT NULL DEFAULT 'user',
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now')),
        last_signed_in TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS companies (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        domain TEXT,
        industry TEXT,
        size_range TEXT,
        headquarters_city TEXT,
        headquarters_state TEXT,
        headquarters_country TEXT,
        logo_url TEXT,
        website TEXT,
        turnover_rate REAL,
        avg_tenure REAL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS culture_scores (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        source TEXT NOT NULL,
        overall_rating REAL,
        work_life_balance REAL,
        compensation_benefits REAL,
        career_opportunities REAL,
        culture_values REAL,
        senior_management REAL,
        ceo_approval REAL,
        recommend_to_friend REAL,
        review_count INTEGER,
        date_collected TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS culture_trends (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        metric_name TEXT NOT NULL,
        metric_value REAL NOT NULL,
        month_year TEXT NOT NULL,
        source TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS layoff_events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        date TEXT NOT NULL,
        employees_affected INTEGER,
        percentage_of_workforce REAL,
        source_url TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        source TEXT NOT NULL,
        rating REAL,
        title TEXT,
        review_text TEXT,
        pros TEXT,
        cons TEXT,
        sentiment_score REAL,
        review_date TEXT,
        job_title TEXT,
        employment_status TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS anonymous_reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        rating REAL NOT NULL,
        title TEXT,
        review_text TEXT,
        pros TEXT,
        cons TEXT,
        job_title TEXT,
        employment_status TEXT,
        work_life_balance REAL,
        compensation_benefits REAL,
        career_opportunities REAL,
        culture_values REAL,
        senior_management REAL,
        is_helpful INTEGER NOT NULL DEFAULT 0,
        is_flagged BOOLEAN NOT NULL DEFAULT FALSE,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS job_openings (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        job_title TEXT NOT NULL,
        job_description TEXT,
        location TEXT,
        job_type TEXT,
        salary_min INTEGER,
        salary_max INTEGER,
        currency TEXT NOT NULL DEFAULT 'USD',
        posted_date TEXT,
        external_url TEXT,
        source TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (company_id, external_url)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS company_news (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER,
        industry_category TEXT,
        headline TEXT NOT NULL,
        summary TEXT,
        full_content TEXT,
        source_url TEXT,
        source_name TEXT,
        published_date TEXT,
        sentiment TEXT,
        relevance_score REAL,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (company_id, source_url)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_favorites (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        company_id INTEGER NOT NULL,
        saved_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (user_id, company_id)
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS saved_comparisons (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        comparison_name TEXT NOT NULL,
        company_ids TEXT NOT NULL,
        notes TEXT,
        saved_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS salary_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        job_title TEXT NOT NULL,
        level TEXT,
        base_salary REAL NOT NULL,
        bonus REAL,
        equity REAL,
        total_compensation REAL NOT NULL,
        currency TEXT NOT NULL DEFAULT 'USD',
        location TEXT,
        years_experience INTEGER,
        data_source TEXT,
        last_updated TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS interview_data (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL,
        external_id TEXT UNIQUE,
        job_title TEXT NOT NULL,
        interview_type TEXT,
        difficulty TEXT,
        duration TEXT,
        questions TEXT,
        experience TEXT,
        outcome TEXT,
        interview_date TEXT,
        data_source TEXT NOT NULL DEFAULT 'Glassdoor',
        cached_at TEXT NOT NULL DEFAULT (datetime('now')),
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS glassdoor_metrics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        company_id INTEGER NOT NULL UNIQUE,
        company_name TEXT NOT NULL,
        overall_rating REAL,
        ceo_approval REAL,
        recommend_to_friend REAL,
        salary_min INTEGER,
        salary_max INTEGER,
        salary_currency TEXT NOT NULL DEFAULT 'USD',
        review_count INTEGER NOT NULL DEFAULT 0,
        interview_count INTEGER NOT NULL DEFAULT 0,
        last_synced_at TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    "CREATE INDEX IF NOT EXISTS idx_culture_scores_company ON culture_scores(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_culture_trends_company ON culture_trends(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_layoff_events_company ON layoff_events(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_company_reviews_company ON company_reviews(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_anonymous_reviews_company ON anonymous_reviews(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_company_news_industry ON company_news(industry_category);",
    "CREATE INDEX IF NOT EXISTS idx_salary_data_company ON salary_data(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_salary_data_role ON salary_data(job_title, level);",
    "CREATE INDEX IF NOT EXISTS idx_interview_data_company ON interview_data(company_id);",
    "CREATE INDEX IF NOT EXISTS idx_saved_comparisons_user ON saved_comparisons(user_id);",
];

#[derive(Debug)]
pub struct DatabaseConfig {
    pub database_path: PathBuf,
    pub pool: Option<SqlitePool>,
}

impl DatabaseConfig {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            database_path,
            pool: None,
        }
    }

    /// Private in-memory database on a single connection, already migrated
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory SQLite database")?;

        let config = Self {
            database_path: PathBuf::from(":memory:"),
            pool: Some(pool),
        };
        config.migrate().await?;
        Ok(config)
    }

    /// Initialize the database connection pool
    pub async fn init_pool(&mut self) -> Result<()> {
        if let Some(parent) = self.database_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Failed to create database directory")?;
        }

        let database_url = format!("sqlite:{}?mode=rwc", self.database_path.display());
        let pool = SqlitePool::connect(&database_url)
            .await
            .with_context(|| format!("Failed to connect to SQLite database {}", database_url))?;
        self.pool = Some(pool);

        app_log!(info, "Database connection pool initialized: {}", database_url);
        Ok(())
    }

    /// Get the database pool
    pub fn pool(&self) -> Result<&SqlitePool> {
        self.pool.as_ref().ok_or_else(|| {
            anyhow::anyhow!("Database pool not initialized. Call init_pool() first.")
        })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        let pool = self.pool()?;

        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(pool)
                .await
                .with_context(|| format!("Migration failed: {}", statement.trim()))?;
        }

        app_log!(info, "Database migrations completed successfully");
        Ok(())
    }

    /// Check database health
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(self.pool()?)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.health_check().await.unwrap();

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
        )
        .fetch_all(db.pool().unwrap())
        .await
        .unwrap();
        assert_eq!(tables.len(), 14);
    }

    #[test]
    fn test_pool_before_init_is_an_error() {
        let db = DatabaseConfig::new(PathBuf::from("/tmp/never-opened.db"));
        assert!(db.pool().is_err());
    }
}
