use crate::UserSummary;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: UserSummary,
    /// Unix timestamp of the last successful login, if any
    pub last_login: Option<i64>,
    pub created_at: i64,
}
