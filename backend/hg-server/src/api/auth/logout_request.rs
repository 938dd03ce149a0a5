use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct LogoutRequest {
    /// Refresh token of the session to end; absent means all sessions
    #[serde(default)]
    pub refresh: Option<String>,
}
