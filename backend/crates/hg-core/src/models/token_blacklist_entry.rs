use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A revoked refresh-token JTI.
///
/// Rows are only useful until the underlying token would have expired
/// anyway; a maintenance sweep removes them after that.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenBlacklistEntry {
    pub jti: String,
    pub user_id: Uuid,
    pub reason: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl TokenBlacklistEntry {
    pub fn new(jti: String, user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            jti,
            user_id,
            reason: None,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn with_reason(mut self, reason: String) -> Self {
        self.reason = Some(reason);
        self
    }
}
