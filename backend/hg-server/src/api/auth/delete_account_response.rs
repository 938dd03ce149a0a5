use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DeleteAccountResponse {
    pub message: String,
    pub deletion_timestamp: String,
}
