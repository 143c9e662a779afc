// src/database/comparisons.rs
use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use crate::types::user::{ComparisonDraft, ComparisonUpdate, SavedComparisonRow};
use crate::types::SavedComparison;

const COMPARISON_COLUMNS: &str =
    "id, user_id, comparison_name, company_ids, notes, saved_at, updated_at";

/// Saved comparisons; every write is scoped to the owning user
pub struct ComparisonRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ComparisonRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<SavedComparison>> {
        let sql = format!(
            "SELECT {} FROM saved_comparisons WHERE user_id = ? ORDER BY updated_at DESC, id DESC",
            COMPARISON_COLUMNS
        );
        let rows = sqlx::query_as::<_, SavedComparisonRow>(&sql)
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        rows.into_iter()
            .map(|row| {
                let id = row.id;
                SavedComparison::try_from(row)
                    .with_context(|| format!("Corrupt company list in comparison {}", id))
            })
            .collect()
    }

    pub async fn create(&self, user_id: i64, draft: &ComparisonDraft) -> Result<i64> {
        let now = Utc::now();
        let company_ids = serde_json::to_string(&draft.company_ids)?;

        let result = sqlx::query(
            r#"
            INSERT INTO saved_comparisons (user_id, comparison_name, company_ids, notes, saved_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&draft.comparison_name)
        .bind(company_ids)
        .bind(&draft.notes)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Apply the provided fields; false when the row is missing or owned by someone else
    pub async fn update(&self, user_id: i64, update: &ComparisonUpdate) -> Result<bool> {
        let company_ids = update
            .company_ids
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let result = sqlx::query(
            r#"
            UPDATE saved_comparisons
            SET comparison_name = COALESCE(?, comparison_name),
                company_ids = COALESCE(?, company_ids),
                notes = COALESCE(?, notes),
                updated_at = ?
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(&update.comparison_name)
        .bind(company_ids)
        .bind(&update.notes)
        .bind(Utc::now())
        .bind(update.id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM saved_comparisons WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;

    #[tokio::test]
    async fn test_owner_check_on_update_and_delete() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = ComparisonRepository::new(db.pool().unwrap());

        let id = repo
            .create(
                1,
                &ComparisonDraft {
                    comparison_name: "Big tech".into(),
                    company_ids: vec![3, 1, 2],
                    notes: None,
                },
            )
            .await
            .unwrap();

        let intruder = ComparisonUpdate {
            id,
            comparison_name: Some("Hijacked".into()),
            company_ids: None,
            notes: None,
        };
        assert!(!repo.update(2, &intruder).await.unwrap());
        assert!(!repo.delete(2, id).await.unwrap());

        let owner = ComparisonUpdate {
            id,
            comparison_name: None,
            company_ids: Some(vec![1, 2]),
            notes: Some("shortlist".into()),
        };
        assert!(repo.update(1, &owner).await.unwrap());

        let saved = repo.list_for_user(1).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].comparison_name, "Big tech");
        assert_eq!(saved[0].company_ids, vec![1, 2]);
        assert_eq!(saved[0].notes.as_deref(), Some("shortlist"));
        assert!(repo.list_for_user(2).await.unwrap().is_empty());

        assert!(repo.delete(1, id).await.unwrap());
        assert!(repo.list_for_user(1).await.unwrap().is_empty());
    }
}
