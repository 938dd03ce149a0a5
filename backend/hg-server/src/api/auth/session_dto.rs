use hg_core::UserSession;

use serde::Serialize;

/// Active session as shown in the device list.
#[derive(Debug, Serialize)]
pub struct SessionDto {
    pub id: String,
    pub device_info: String,
    pub device_type: String,
    pub ip_address: String,
    pub last_activity: i64,
    pub created_at: i64,
    pub remember_me: bool,
    /// Whether this session issued the access token making the request
    pub is_current: bool,
}

impl SessionDto {
    pub fn from_session(s: &UserSession, is_current: bool) -> Self {
        Self {
            id: s.id.to_string(),
            device_info: s.device_summary(),
            device_type: s.device_type.clone(),
            ip_address: s.ip_address.clone(),
            last_activity: s.last_activity.timestamp(),
            created_at: s.created_at.timestamp(),
            remember_me: s.remember_me,
            is_current,
        }
    }
}
