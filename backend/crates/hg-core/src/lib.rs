pub mod error;
pub mod models;

pub use error::{CoreError, Result};
pub use models::audit_action::AuditAction;
pub use models::device_info::DeviceInfo;
pub use models::security_audit_entry::SecurityAuditEntry;
pub use models::token_blacklist_entry::TokenBlacklistEntry;
pub use models::user::User;
pub use models::user_session::UserSession;

#[cfg(test)]
mod tests;
