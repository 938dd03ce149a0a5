use crate::UserSummary;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct VerifyEmailResponse {
    pub message: String,
    pub user: UserSummary,
}
