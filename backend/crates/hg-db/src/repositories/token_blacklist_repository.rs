use crate::Result as DbErrorResult;

use hg_core::TokenBlacklistEntry;

use sqlx::{Row, SqlitePool};

pub struct TokenBlacklistRepository {
    pool: SqlitePool,
}

impl TokenBlacklistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Revoking an already-revoked JTI is a no-op, not an error.
    pub async fn insert(&self, entry: &TokenBlacklistEntry) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT OR IGNORE INTO hg_token_blacklist (
                                                          jti, user_id, reason,
                                                          expires_at, created_at
                                                          ) VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.jti)
        .bind(entry.user_id.to_string())
        .bind(&entry.reason)
        .bind(entry.expires_at.timestamp())
        .bind(entry.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn contains(&self, jti: &str) -> DbErrorResult<bool> {
        let row = sqlx::query(
            r#"
                SELECT COUNT(*) AS n FROM hg_token_blacklist WHERE jti = ?
            "#,
        )
        .bind(jti)
        .fetch_one(&self.pool)
        .await?;

        let count: i64 = row.try_get("n")?;
        Ok(count > 0)
    }

    /// Entries for tokens past their natural expiry can no longer be
    /// replayed and are safe to drop.
    pub async fn delete_expired(&self, now: i64) -> DbErrorResult<u64> {
        let result = sqlx::query(
            r#"
                DELETE FROM hg_token_blacklist
                WHERE expires_at <= ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
