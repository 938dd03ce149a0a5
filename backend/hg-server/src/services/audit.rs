use crate::api::extractors::client_meta::ClientMeta;

use hg_core::{AuditAction, SecurityAuditEntry};
use hg_db::AuditLogRepository;

use log::warn;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Fire-and-forget writer for the security audit log.
///
/// A failed write must never fail the request that triggered it; it is
/// logged locally instead.
#[derive(Clone)]
pub struct AuditLogger {
    pool: SqlitePool,
}

impl AuditLogger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: AuditAction,
        meta: &ClientMeta,
        details: Option<serde_json::Value>,
    ) {
        self.write(SecurityAuditEntry::new(user_id, action), meta, details)
            .await;
    }

    /// A rejected or failed action: the entry carries `success = false`.
    pub async fn record_failure(
        &self,
        user_id: Option<Uuid>,
        action: AuditAction,
        meta: &ClientMeta,
        details: Option<serde_json::Value>,
    ) {
        self.write(
            SecurityAuditEntry::new(user_id, action).failed(),
            meta,
            details,
        )
        .await;
    }

    /// An action concerning one specific session.
    pub async fn record_for_session(
        &self,
        user_id: Uuid,
        action: AuditAction,
        session_id: Uuid,
        meta: &ClientMeta,
        details: Option<serde_json::Value>,
    ) {
        self.write(
            SecurityAuditEntry::new(Some(user_id), action).with_session(session_id),
            meta,
            details,
        )
        .await;
    }

    async fn write(
        &self,
        entry: SecurityAuditEntry,
        meta: &ClientMeta,
        details: Option<serde_json::Value>,
    ) {
        let action = entry.action;
        let mut entry = entry.with_client(meta.ip_address.clone(), meta.user_agent.clone());
        if let Some(details) = details {
            entry = entry.with_details(details);
        }

        if let Err(e) = AuditLogRepository::new(self.pool.clone()).create(&entry).await {
            warn!("Failed to write audit entry {}: {}", action, e);
        }
    }
}
