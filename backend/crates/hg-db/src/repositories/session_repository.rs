use crate::{DbError, Result as DbErrorResult};

use hg_core::UserSession;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const SESSION_COLUMNS: &str = "id, user_id, session_key, refresh_jti, device_type, browser, os, \
     ip_address, user_agent, remember_me, is_active, created_at, last_activity, expires_at";

pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &UserSession) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO hg_user_sessions (
                                              id, user_id, session_key, refresh_jti,
                                              device_type, browser, os, ip_address, user_agent,
                                              remember_me, is_active,
                                              created_at, last_activity, expires_at
                                              ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.user_id.to_string())
        .bind(&session.session_key)
        .bind(&session.refresh_jti)
        .bind(&session.device_type)
        .bind(&session.browser)
        .bind(&session.os)
        .bind(&session.ip_address)
        .bind(&session.user_agent)
        .bind(session.remember_me)
        .bind(session.is_active)
        .bind(session.created_at.timestamp())
        .bind(session.last_activity.timestamp())
        .bind(session.expires_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<UserSession>> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM hg_user_sessions WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_session(&r)).transpose()
    }

    /// Looks up the live session bound to a refresh token JTI. Expired or
    /// terminated sessions never match, so a stale token cannot refresh.
    pub async fn find_active_by_refresh_jti(
        &self,
        jti: &str,
        now: i64,
    ) -> DbErrorResult<Option<UserSession>> {
        let row = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM hg_user_sessions \
             WHERE refresh_jti = ? AND is_active = 1 AND expires_at > ?"
        ))
        .bind(jti)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_session(&r)).transpose()
    }

    pub async fn find_active_by_user(
        &self,
        user_id: Uuid,
        now: i64,
    ) -> DbErrorResult<Vec<UserSession>> {
        let rows = sqlx::query(&format!(
            "SELECT {SESSION_COLUMNS} FROM hg_user_sessions \
             WHERE user_id = ? AND is_active = 1 AND expires_at > ? \
             ORDER BY last_activity DESC"
        ))
        .bind(user_id.to_string())
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(map_session)
            .collect::<DbErrorResult<Vec<_>>>()
    }

    pub async fn terminate(&self, id: Uuid) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                UPDATE hg_user_sessions
                SET is_active = 0
                WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Terminates every active session for a user, optionally sparing one
    /// (the caller's own session on password change). Returns the count.
    pub async fn terminate_all_for_user(
        &self,
        user_id: Uuid,
        except: Option<Uuid>,
    ) -> DbErrorResult<u64> {
        let except_id = except.map(|id| id.to_string()).unwrap_or_default();

        let result = sqlx::query(
            r#"
                UPDATE hg_user_sessions
                SET is_active = 0
                WHERE user_id = ? AND is_active = 1 AND id <> ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(except_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Swaps the stored refresh JTI for a new one, guarded by the old value.
    /// Returns false when the old JTI no longer matches, which means the
    /// token was already rotated or the session was terminated.
    pub async fn rotate_refresh(
        &self,
        id: Uuid,
        old_jti: &str,
        new_jti: &str,
        new_expires_at: Option<i64>,
        now: i64,
    ) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                UPDATE hg_user_sessions
                SET refresh_jti = ?,
                    last_activity = ?,
                    expires_at = COALESCE(?, expires_at)
                WHERE id = ? AND refresh_jti = ? AND is_active = 1
            "#,
        )
        .bind(new_jti)
        .bind(now)
        .bind(new_expires_at)
        .bind(id.to_string())
        .bind(old_jti)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    pub async fn touch(&self, id: Uuid, now: i64) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_user_sessions
                SET last_activity = ?
                WHERE id = ? AND is_active = 1
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn terminate_expired(&self, now: i64) -> DbErrorResult<u64> {
        let result = sqlx::query(
            r#"
                UPDATE hg_user_sessions
                SET is_active = 0
                WHERE is_active = 1 AND expires_at <= ?
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Purges terminated sessions whose expiry is older than the cutoff.
    pub async fn delete_inactive_before(&self, cutoff: i64) -> DbErrorResult<u64> {
        let result = sqlx::query(
            r#"
                DELETE FROM hg_user_sessions
                WHERE is_active = 0 AND expires_at < ?
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn map_session(r: &SqliteRow) -> DbErrorResult<UserSession> {
    let id: String = r.try_get("id")?;
    let user_id: String = r.try_get("user_id")?;
    let created_at: i64 = r.try_get("created_at")?;
    let last_activity: i64 = r.try_get("last_activity")?;
    let expires_at: i64 = r.try_get("expires_at")?;

    Ok(UserSession {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt_row(format!("Invalid UUID in session.id: {}", e)))?,
        user_id: Uuid::parse_str(&user_id)
            .map_err(|e| DbError::corrupt_row(format!("Invalid UUID in session.user_id: {}", e)))?,
        session_key: r.try_get("session_key")?,
        refresh_jti: r.try_get("refresh_jti")?,
        device_type: r.try_get("device_type")?,
        browser: r.try_get("browser")?,
        os: r.try_get("os")?,
        ip_address: r.try_get("ip_address")?,
        user_agent: r.try_get("user_agent")?,
        remember_me: r.try_get("remember_me")?,
        is_active: r.try_get("is_active")?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in session.created_at"))?,
        last_activity: DateTime::from_timestamp(last_activity, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in session.last_activity"))?,
        expires_at: DateTime::from_timestamp(expires_at, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in session.expires_at"))?,
    })
}
