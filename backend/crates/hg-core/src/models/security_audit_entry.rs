use crate::AuditAction;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One append-only row in the security audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityAuditEntry {
    pub id: Uuid,

    /// Absent for failed logins against unknown identifiers.
    pub user_id: Option<Uuid>,

    pub action: AuditAction,

    /// Whether the recorded action succeeded. Failed logins and lockouts
    /// carry `false`; everything else records the action having happened.
    pub success: bool,

    /// The session the action concerns, when there is one.
    pub session_id: Option<Uuid>,

    pub ip_address: Option<String>,
    pub user_agent: Option<String>,

    /// Free-form JSON context (never credentials or tokens).
    pub details: Option<serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

impl SecurityAuditEntry {
    pub fn new(user_id: Option<Uuid>, action: AuditAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            action,
            success: true,
            session_id: None,
            ip_address: None,
            user_agent: None,
            details: None,
            created_at: Utc::now(),
        }
    }

    pub fn failed(mut self) -> Self {
        self.success = false;
        self
    }

    pub fn with_session(mut self, session_id: Uuid) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub fn with_client(mut self, ip_address: String, user_agent: String) -> Self {
        self.ip_address = Some(ip_address);
        self.user_agent = Some(user_agent);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}
