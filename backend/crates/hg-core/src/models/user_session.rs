use crate::DeviceInfo;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSession {
    pub id: Uuid,
    pub user_id: Uuid,

    /// Opaque key identifying the session independently of any token.
    pub session_key: String,
    /// JTI of the refresh token currently bound to this session.
    pub refresh_jti: String,

    pub device_type: String,
    pub browser: String,
    pub os: String,
    pub ip_address: String,
    pub user_agent: String,

    pub remember_me: bool,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl UserSession {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: Uuid,
        session_key: String,
        refresh_jti: String,
        device: DeviceInfo,
        ip_address: String,
        user_agent: String,
        remember_me: bool,
        ttl_days: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            session_key,
            refresh_jti,
            device_type: device.device_type,
            browser: device.browser,
            os: device.os,
            ip_address,
            user_agent,
            remember_me,
            is_active: true,
            created_at: now,
            last_activity: now,
            expires_at: now + Duration::days(ttl_days as i64),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// Human-readable device summary for the sessions list.
    pub fn device_summary(&self) -> String {
        format!("{} on {} ({})", self.browser, self.os, self.device_type)
    }
}
