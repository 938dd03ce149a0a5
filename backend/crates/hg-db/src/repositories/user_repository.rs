use crate::{DbError, Result as DbErrorResult};

use hg_core::User;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, \
     is_active, email_verified, failed_login_attempts, account_locked_until, \
     email_verification_token, password_reset_token, password_reset_expires, \
     last_login, last_login_ip, created_at, updated_at";

pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, user: &User) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                INSERT INTO hg_users (
                                      id, username, email, password_hash,
                                      first_name, last_name, is_active, email_verified,
                                      failed_login_attempts, account_locked_until,
                                      email_verification_token,
                                      password_reset_token, password_reset_expires,
                                      last_login, last_login_ip, created_at, updated_at
                                      ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.failed_login_attempts)
        .bind(user.account_locked_until.map(|dt| dt.timestamp()))
        .bind(&user.email_verification_token)
        .bind(&user.password_reset_token)
        .bind(user.password_reset_expires.map(|dt| dt.timestamp()))
        .bind(user.last_login.map(|dt| dt.timestamp()))
        .bind(&user.last_login_ip)
        .bind(user.created_at.timestamp())
        .bind(user.updated_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM hg_users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_username(&self, username: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM hg_users WHERE username = ?"
        ))
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn find_by_email(&self, email: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM hg_users WHERE email = ?"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    /// Login accepts either a username or an email address.
    pub async fn find_by_identifier(&self, identifier: &str) -> DbErrorResult<Option<User>> {
        if identifier.contains('@') {
            self.find_by_email(identifier).await
        } else {
            self.find_by_username(identifier).await
        }
    }

    /// New password invalidates any outstanding reset token.
    pub async fn update_password(
        &self,
        id: Uuid,
        password_hash: &str,
        now: i64,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET password_hash = ?,
                    password_reset_token = NULL,
                    password_reset_expires = NULL,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_email_verified(&self, id: Uuid, now: i64) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET email_verified = 1,
                    email_verification_token = NULL,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_verification_token(
        &self,
        id: Uuid,
        token: &str,
        now: i64,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET email_verification_token = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(token)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_verification_token(&self, token: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM hg_users WHERE email_verification_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    pub async fn set_reset_token(
        &self,
        id: Uuid,
        token: &str,
        expires_at: i64,
        now: i64,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET password_reset_token = ?,
                    password_reset_expires = ?,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(token)
        .bind(expires_at)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn find_by_reset_token(&self, token: &str) -> DbErrorResult<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {USER_COLUMNS} FROM hg_users WHERE password_reset_token = ?"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| map_user(&r)).transpose()
    }

    /// Changing the address drops verification until the new one is confirmed.
    pub async fn update_email(&self, id: Uuid, email: &str, now: i64) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET email = ?, email_verified = 0, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(email)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        first_name: &str,
        last_name: &str,
        now: i64,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET first_name = ?, last_name = ?, updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Bumps the failure counter and locks the account once it reaches
    /// `max_attempts`. Returns true when this call triggered the lock.
    ///
    /// Counter increment and lock decision happen in one statement so
    /// concurrent failures cannot both observe the pre-lock count.
    pub async fn record_failed_login(
        &self,
        id: Uuid,
        max_attempts: u32,
        lockout_secs: i64,
        now: i64,
    ) -> DbErrorResult<bool> {
        let row = sqlx::query(
            r#"
                UPDATE hg_users
                SET failed_login_attempts = failed_login_attempts + 1,
                    account_locked_until = CASE
                        WHEN failed_login_attempts + 1 >= ? THEN ? + ?
                        ELSE account_locked_until
                    END,
                    updated_at = ?
                WHERE id = ?
                RETURNING failed_login_attempts
            "#,
        )
        .bind(max_attempts as i64)
        .bind(now)
        .bind(lockout_secs)
        .bind(now)
        .bind(id.to_string())
        .fetch_one(&self.pool)
        .await?;

        let attempts: i64 = row.try_get("failed_login_attempts")?;
        Ok(attempts >= max_attempts as i64)
    }

    /// Resets the failure counter, clears any lock and stamps last login.
    pub async fn record_successful_login(
        &self,
        id: Uuid,
        ip_address: &str,
        now: i64,
    ) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET failed_login_attempts = 0,
                    account_locked_until = NULL,
                    last_login = ?,
                    last_login_ip = ?,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(ip_address)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn unlock(&self, id: Uuid, now: i64) -> DbErrorResult<()> {
        sqlx::query(
            r#"
                UPDATE hg_users
                SET failed_login_attempts = 0,
                    account_locked_until = NULL,
                    updated_at = ?
                WHERE id = ?
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Clears locks that have already expired so stale counters do not
    /// linger on accounts nobody logs into. Returns affected row count.
    pub async fn clear_expired_locks(&self, now: i64) -> DbErrorResult<u64> {
        let result = sqlx::query(
            r#"
                UPDATE hg_users
                SET failed_login_attempts = 0,
                    account_locked_until = NULL,
                    updated_at = ?
                WHERE account_locked_until IS NOT NULL AND account_locked_until <= ?
            "#,
        )
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Deactivates the account and mangles the unique columns so the
    /// username and email become available for re-registration.
    /// Already-deleted rows are left untouched.
    pub async fn soft_delete(&self, id: Uuid, now: i64) -> DbErrorResult<bool> {
        let result = sqlx::query(
            r#"
                UPDATE hg_users
                SET username = 'deleted_' || id || '_' || username,
                    email = 'deleted_' || id || '_' || email,
                    is_active = 0,
                    updated_at = ?
                WHERE id = ? AND username NOT LIKE 'deleted\_%' ESCAPE '\'
            "#,
        )
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn map_user(r: &SqliteRow) -> DbErrorResult<User> {
    let id: String = r.try_get("id")?;
    let account_locked_until: Option<i64> = r.try_get("account_locked_until")?;
    let password_reset_expires: Option<i64> = r.try_get("password_reset_expires")?;
    let last_login: Option<i64> = r.try_get("last_login")?;
    let created_at: i64 = r.try_get("created_at")?;
    let updated_at: i64 = r.try_get("updated_at")?;

    Ok(User {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt_row(format!("Invalid UUID in user.id: {}", e)))?,
        username: r.try_get("username")?,
        email: r.try_get("email")?,
        password_hash: r.try_get("password_hash")?,
        first_name: r.try_get("first_name")?,
        last_name: r.try_get("last_name")?,
        is_active: r.try_get("is_active")?,
        email_verified: r.try_get("email_verified")?,
        failed_login_attempts: r.try_get("failed_login_attempts")?,
        account_locked_until: account_locked_until.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        email_verification_token: r.try_get("email_verification_token")?,
        password_reset_token: r.try_get("password_reset_token")?,
        password_reset_expires: password_reset_expires
            .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        last_login: last_login.and_then(|ts| DateTime::from_timestamp(ts, 0)),
        last_login_ip: r.try_get("last_login_ip")?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in user.created_at"))?,
        updated_at: DateTime::from_timestamp(updated_at, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in user.updated_at"))?,
    })
}
