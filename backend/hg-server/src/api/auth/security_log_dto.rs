use hg_core::SecurityAuditEntry;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SecurityLogDto {
    pub id: String,
    pub action: String,
    pub success: bool,
    pub session_id: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: i64,
}

impl From<SecurityAuditEntry> for SecurityLogDto {
    fn from(e: SecurityAuditEntry) -> Self {
        Self {
            id: e.id.to_string(),
            action: e.action.to_string(),
            success: e.success,
            session_id: e.session_id.map(|id| id.to_string()),
            ip_address: e.ip_address,
            user_agent: e.user_agent,
            details: e.details,
            created_at: e.created_at.timestamp(),
        }
    }
}
