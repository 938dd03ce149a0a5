use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct DeleteAccountRequest {
    pub password: String,
    /// Must be exactly "DELETE MY ACCOUNT"
    pub confirmation: String,
}
