use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct UpdateEmailResponse {
    pub message: String,
    pub email_verification_sent: bool,
    pub new_email: String,
}
