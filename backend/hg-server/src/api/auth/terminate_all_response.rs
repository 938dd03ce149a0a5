use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TerminateAllResponse {
    pub message: String,
    pub terminated_count: u64,
}
