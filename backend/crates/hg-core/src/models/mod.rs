pub mod audit_action;
pub mod device_info;
pub mod security_audit_entry;
pub mod token_blacklist_entry;
pub mod user;
pub mod user_session;
