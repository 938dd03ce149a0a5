use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,

    pub username: String,
    pub email: String,
    pub password_hash: String,

    pub first_name: String,
    pub last_name: String,

    pub is_active: bool,
    pub email_verified: bool,

    pub failed_login_attempts: i64,
    pub account_locked_until: Option<DateTime<Utc>>,

    /// Outstanding email verification token, if one was issued.
    pub email_verification_token: Option<String>,
    /// Outstanding password reset token and its expiry.
    pub password_reset_token: Option<String>,
    pub password_reset_expires: Option<DateTime<Utc>>,

    pub last_login: Option<DateTime<Utc>>,
    pub last_login_ip: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        username: String,
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            is_active: true,
            email_verified: false,
            failed_login_attempts: 0,
            account_locked_until: None,
            email_verification_token: None,
            password_reset_token: None,
            password_reset_expires: None,
            last_login: None,
            last_login_ip: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Lockout is a lazy time comparison; expired locks need no cleanup
    /// to become ineffective.
    pub fn is_locked(&self) -> bool {
        match self.account_locked_until {
            Some(until) => until > Utc::now(),
            None => false,
        }
    }

    /// Seconds until the current lock expires, if one is in effect.
    pub fn lock_remaining_secs(&self) -> Option<i64> {
        self.account_locked_until
            .map(|until| (until - Utc::now()).num_seconds())
            .filter(|secs| *secs > 0)
    }

    /// Failed attempts left before the account locks.
    pub fn remaining_attempts(&self, max_attempts: u32) -> u32 {
        (max_attempts as i64).saturating_sub(self.failed_login_attempts) as u32
    }
}
