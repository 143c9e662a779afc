// src/types/user.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

/// Stored row; `company_ids` holds a JSON array
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SavedComparisonRow {
    pub id: i64,
    pub user_id: i64,
    pub comparison_name: String,
    pub company_ids: String,
    pub notes: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedComparison {
    pub id: i64,
    pub user_id: i64,
    pub comparison_name: String,
    pub company_ids: Vec<i64>,
    pub notes: Option<String>,
    pub saved_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SavedComparisonRow> for SavedComparison {
    type Error = serde_json::Error;

    fn try_from(row: SavedComparisonRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            comparison_name: row.comparison_name,
            company_ids: serde_json::from_str(&row.company_ids)?,
            notes: row.notes,
            saved_at: row.saved_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonDraft {
    pub comparison_name: String,
    pub company_ids: Vec<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonUpdate {
    pub id: i64,
    pub comparison_name: Option<String>,
    pub company_ids: Option<Vec<i64>>,
    pub notes: Option<String>,
}
