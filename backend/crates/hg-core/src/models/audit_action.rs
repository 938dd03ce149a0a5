use crate::CoreError;

use std::fmt;
use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Closed set of security-relevant actions recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Login,
    LoginFailed,
    Logout,
    Register,
    PasswordResetRequest,
    PasswordResetConfirm,
    PasswordChange,
    EmailVerification,
    EmailUpdate,
    AccountLocked,
    AccountUnlocked,
    AccountDeletion,
    ProfileUpdate,
    HijackStarted,
    HijackEnded,
    SessionCreated,
    SessionTerminated,
    TokenRefreshed,
    IpChange,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::LoginFailed => "login_failed",
            Self::Logout => "logout",
            Self::Register => "register",
            Self::PasswordResetRequest => "password_reset_request",
            Self::PasswordResetConfirm => "password_reset_confirm",
            Self::PasswordChange => "password_change",
            Self::EmailVerification => "email_verification",
            Self::EmailUpdate => "email_update",
            Self::AccountLocked => "account_locked",
            Self::AccountUnlocked => "account_unlocked",
            Self::AccountDeletion => "account_deletion",
            Self::ProfileUpdate => "profile_update",
            Self::HijackStarted => "hijack_started",
            Self::HijackEnded => "hijack_ended",
            Self::SessionCreated => "session_created",
            Self::SessionTerminated => "session_terminated",
            Self::TokenRefreshed => "token_refreshed",
            Self::IpChange => "ip_change",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuditAction {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "login" => Ok(Self::Login),
            "login_failed" => Ok(Self::LoginFailed),
            "logout" => Ok(Self::Logout),
            "register" => Ok(Self::Register),
            "password_reset_request" => Ok(Self::PasswordResetRequest),
            "password_reset_confirm" => Ok(Self::PasswordResetConfirm),
            "password_change" => Ok(Self::PasswordChange),
            "email_verification" => Ok(Self::EmailVerification),
            "email_update" => Ok(Self::EmailUpdate),
            "account_locked" => Ok(Self::AccountLocked),
            "account_unlocked" => Ok(Self::AccountUnlocked),
            "account_deletion" => Ok(Self::AccountDeletion),
            "profile_update" => Ok(Self::ProfileUpdate),
            "hijack_started" => Ok(Self::HijackStarted),
            "hijack_ended" => Ok(Self::HijackEnded),
            "session_created" => Ok(Self::SessionCreated),
            "session_terminated" => Ok(Self::SessionTerminated),
            "token_refreshed" => Ok(Self::TokenRefreshed),
            "ip_change" => Ok(Self::IpChange),
            _ => Err(CoreError::InvalidAuditAction {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}
