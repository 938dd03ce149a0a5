use crate::SessionDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SessionListResponse {
    pub sessions: Vec<SessionDto>,
    pub total_sessions: usize,
}
