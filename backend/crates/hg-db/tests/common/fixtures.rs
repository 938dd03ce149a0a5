use hg_core::{AuditAction, DeviceInfo, SecurityAuditEntry, TokenBlacklistEntry, User, UserSession};

use chrono::{Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use hg_db::UserRepository;

pub fn build_test_user(tag: &str) -> User {
    User::new(
        format!("user_{}", tag),
        format!("{}@example.com", tag),
        "$2b$12$fakehashfakehashfakehashfakehashfakehashfakehashfake".to_string(),
        "Test".to_string(),
        "User".to_string(),
    )
}

/// Inserts a user row for tests that need the foreign key satisfied.
pub async fn create_test_user(pool: &SqlitePool, tag: &str) -> User {
    let user = build_test_user(tag);
    UserRepository::new(pool.clone())
        .create(&user)
        .await
        .expect("Failed to create test user");
    user
}

pub fn build_test_session(user_id: Uuid, refresh_jti: &str) -> UserSession {
    UserSession::new(
        user_id,
        Uuid::new_v4().to_string(),
        refresh_jti.to_string(),
        DeviceInfo::parse("Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0"),
        "203.0.113.10".to_string(),
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Chrome/120.0".to_string(),
        false,
        7,
    )
}

/// Audit entry with created_at shifted by `offset_secs` from now.
pub fn build_audit_entry_at(
    user_id: Option<Uuid>,
    action: AuditAction,
    offset_secs: i64,
) -> SecurityAuditEntry {
    let mut entry = SecurityAuditEntry::new(user_id, action);
    entry.created_at = Utc::now() + Duration::seconds(offset_secs);
    entry
}

pub fn build_blacklist_entry(user_id: Uuid, ttl_secs: i64) -> TokenBlacklistEntry {
    TokenBlacklistEntry::new(
        Uuid::new_v4().to_string(),
        user_id,
        Utc::now() + Duration::seconds(ttl_secs),
    )
}
