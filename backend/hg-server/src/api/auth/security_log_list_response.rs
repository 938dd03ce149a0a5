use crate::SecurityLogDto;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SecurityLogListResponse {
    pub logs: Vec<SecurityLogDto>,
}
