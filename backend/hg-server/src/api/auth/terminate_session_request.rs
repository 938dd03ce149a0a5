use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TerminateSessionRequest {
    pub session_id: String,
}
