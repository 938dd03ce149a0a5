use crate::{DbError, Result as DbErrorResult};

use hg_core::{AuditAction, SecurityAuditEntry};

use std::str::FromStr;

use chrono::DateTime;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

pub struct AuditLogRepository {
    pool: SqlitePool,
}

impl AuditLogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, entry: &SecurityAuditEntry) -> DbErrorResult<()> {
        let details = entry
            .details
            .as_ref()
            .map(|d| d.to_string());

        sqlx::query(
            r#"
                INSERT INTO hg_security_audit_log (
                                                   id, user_id, action, success, session_id,
                                                   ip_address, user_agent, details, created_at
                                                   ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(entry.id.to_string())
        .bind(entry.user_id.map(|id| id.to_string()))
        .bind(entry.action.as_str())
        .bind(entry.success)
        .bind(entry.session_id.map(|id| id.to_string()))
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(details)
        .bind(entry.created_at.timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent entries for one user, newest first.
    pub async fn find_recent_by_user(
        &self,
        user_id: Uuid,
        limit: u32,
    ) -> DbErrorResult<Vec<SecurityAuditEntry>> {
        let rows = sqlx::query(
            r#"
                SELECT id, user_id, action, success, session_id,
                       ip_address, user_agent, details, created_at
                FROM hg_security_audit_log
                WHERE user_id = ?
                ORDER BY created_at DESC
                LIMIT ?
            "#,
        )
        .bind(user_id.to_string())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_entry).collect::<DbErrorResult<Vec<_>>>()
    }

    /// Retention sweep. Returns the number of rows removed.
    pub async fn delete_older_than(&self, cutoff: i64) -> DbErrorResult<u64> {
        let result = sqlx::query(
            r#"
                DELETE FROM hg_security_audit_log
                WHERE created_at < ?
            "#,
        )
        .bind(cutoff)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

fn map_entry(r: &SqliteRow) -> DbErrorResult<SecurityAuditEntry> {
    let id: String = r.try_get("id")?;
    let user_id: Option<String> = r.try_get("user_id")?;
    let action: String = r.try_get("action")?;
    let session_id: Option<String> = r.try_get("session_id")?;
    let details: Option<String> = r.try_get("details")?;
    let created_at: i64 = r.try_get("created_at")?;

    Ok(SecurityAuditEntry {
        id: Uuid::parse_str(&id)
            .map_err(|e| DbError::corrupt_row(format!("Invalid UUID in audit.id: {}", e)))?,
        user_id: user_id
            .map(|s| {
                Uuid::parse_str(&s).map_err(|e| {
                    DbError::corrupt_row(format!("Invalid UUID in audit.user_id: {}", e))
                })
            })
            .transpose()?,
        action: AuditAction::from_str(&action)
            .map_err(|e| DbError::corrupt_row(format!("Invalid action in audit.action: {}", e)))?,
        success: r.try_get("success")?,
        session_id: session_id
            .map(|s| {
                Uuid::parse_str(&s).map_err(|e| {
                    DbError::corrupt_row(format!("Invalid UUID in audit.session_id: {}", e))
                })
            })
            .transpose()?,
        ip_address: r.try_get("ip_address")?,
        user_agent: r.try_get("user_agent")?,
        details: details
            .map(|s| {
                serde_json::from_str(&s).map_err(|e| {
                    DbError::corrupt_row(format!("Invalid JSON in audit.details: {}", e))
                })
            })
            .transpose()?,
        created_at: DateTime::from_timestamp(created_at, 0)
            .ok_or_else(|| DbError::corrupt_row("Invalid timestamp in audit.created_at"))?,
    })
}
