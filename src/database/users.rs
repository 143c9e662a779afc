// src/database/users.rs
use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::app_log;
use crate::types::User;

pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

/// Identity attributes carried by a session
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    pub open_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub login_method: Option<String>,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn find_by_open_id(&self, open_id: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, open_id, name, email, login_method, role,
                   created_at, updated_at, last_signed_in
            FROM users
            WHERE open_id = ?
            "#,
        )
        .bind(open_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Insert the user on first sight, otherwise refresh the provided
    /// attributes and stamp the sign-in time
    pub async fn upsert_signed_in(&self, identity: &SessionIdentity) -> Result<User> {
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (open_id, name, email, login_method, role,
                               created_at, updated_at, last_signed_in)
            VALUES (?, ?, ?, ?, 'user', ?, ?, ?)
            ON CONFLICT(open_id) DO UPDATE SET
                name = COALESCE(excluded.name, users.name),
                email = COALESCE(excluded.email, users.email),
                login_method = COALESCE(excluded.login_method, users.login_method),
                updated_at = excluded.updated_at,
                last_signed_in = excluded.last_signed_in
            "#,
        )
        .bind(&identity.open_id)
        .bind(&identity.name)
        .bind(&identity.email)
        .bind(&identity.login_method)
        .bind(now)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        let user = self
            .find_by_open_id(&identity.open_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User {} vanished after upsert", identity.open_id))?;

        app_log!(debug, "User {} signed in", user.id);
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConfig;

    #[tokio::test]
    async fn test_upsert_keeps_single_row_and_preserves_fields() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().unwrap());

        let first = repo
            .upsert_signed_in(&SessionIdentity {
                open_id: "abc".into(),
                name: Some("Dana".into()),
                email: Some("dana@example.com".into()),
                login_method: None,
            })
            .await
            .unwrap();

        let second = repo
            .upsert_signed_in(&SessionIdentity {
                open_id: "abc".into(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(second.name.as_deref(), Some("Dana"));
        assert_eq!(second.role, "user");
        assert!(second.last_signed_in >= first.last_signed_in);
    }

    #[tokio::test]
    async fn test_unknown_open_id() {
        let db = DatabaseConfig::in_memory().await.unwrap();
        let repo = UserRepository::new(db.pool().unwrap());
        assert!(repo.find_by_open_id("nobody").await.unwrap().is_none());
    }
}
