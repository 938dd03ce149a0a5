use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct UpdateEmailRequest {
    pub new_email: String,
    /// Re-authentication is required to change the address
    pub current_password: String,
}
