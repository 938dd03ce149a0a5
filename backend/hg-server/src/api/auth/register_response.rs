use crate::UserSummary;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
    pub email_verification_sent: bool,
}
