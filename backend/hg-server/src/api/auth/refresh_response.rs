use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
    /// The same refresh token when rotation is disabled, a new one otherwise
    pub refresh: String,
    pub expires_in: u64,
    pub session_id: String,
}
