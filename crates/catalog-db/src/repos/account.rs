use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Identity-store row. Only the argon2 hash is ever persisted.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub user_id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

pub struct AccountRepo;

impl AccountRepo {
    pub async fn create(
        pool: &PgPool,
        user_id: Uuid,
        email: &str,
        password_hash: &str,
    ) -> Result<()> {
        sqlx::query("INSERT INTO account (user_id, email, password_hash) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(email)
            .bind(password_hash)
            .execute(pool)
            .await
            .context("Failed to create account")?;
        Ok(())
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            "SELECT user_id, email, password_hash, created_at FROM account WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get account by email")?;
        Ok(row)
    }
}
