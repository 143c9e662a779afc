// src/database/salary.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::types::salary::{NewSalaryRecord, SalaryCompareFilter, SalaryRecord};

const SALARY_COLUMNS: &str = "id, company_id, job_title, level, base_salary, bonus, equity, \
     total_compensation, currency, location, years_experience, data_source, last_updated, \
     created_at";

pub struct SalaryRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> SalaryRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn for_company(&self, company_id: i64) -> Result<Vec<SalaryRecord>> {
        let sql = format!(
            "SELECT {} FROM salary_data WHERE company_id = ? ORDER BY job_title ASC, level ASC",
            SALARY_COLUMNS
        );
        let rows = sqlx::query_as::<_, SalaryRecord>(&sql)
            .bind(company_id)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn all(&self) -> Result<Vec<SalaryRecord>> {
        let sql = format!("SELECT {} FROM salary_data ORDER BY id ASC", SALARY_COLUMNS);
        let rows = sqlx::query_as::<_, SalaryRecord>(&sql)
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// Exact-match filters; absent or empty criteria are ignored
    pub async fn compare(&self, filter: &SalaryCompareFilter) -> Result<Vec<SalaryRecord>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM salary_data WHERE 1 = 1", SALARY_COLUMNS));

        if let Some(job_title) = filter.job_title.as_ref().filter(|t| !t.is_empty()) {
            query.push(" AND job_title = ").push_bind(job_title.clone());
        }
        if let Some(level) = filter.level.as_ref().filter(|l| !l.is_empty()) {
            query.push(" AND level = ").push_bind(level.clone());
        }
        if let Some(ids) = filter.company_ids.as_ref().filter(|ids| !ids.is_empty()) {
            query.push(" AND company_id IN (");
            let mut separated = query.separated(", ");
            for id in ids {
                separated.push_bind(*id);
            }
            separated.push_unseparated(")");
        }
        query.push(" ORDER BY company_id ASC, job_title ASC, level ASC");

        let rows = query
            .build_query_as::<SalaryRecord>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn distinct_job_titles(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT DISTINCT job_title FROM salary_data ORDER BY job_title ASC")
                .fetch_all(self.pool)
                .await?;
        Ok(rows.into_iter().map(|(title,)| title).collect())
    }

    pub async fn distinct_levels(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT DISTINCT level FROM salary_data WHERE level IS NOT NULL ORDER BY level ASC",
        )
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(|(level,)| level).collect())
    }

    pub async fn insert(&self, record: &NewSalaryRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO salary_data (company_id, job_title, level, base_salary, bonus, equity,
                                     total_compensation, currency, location, years_experience,
                                     data_source, last_updated, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.company_id)
        .bind(&record.job_title)
        .bind(&record.level)
        .bind(record.base_salary)
        .bind(record.bonus)
        .bind(record.equity)
        .bind(record.total_compensation)
        .bind(&record.currency)
        .bind(&record.location)
        .bind(record.years_experience)
        .bind(&record.data_source)
        .bind(record.last_updated)
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
