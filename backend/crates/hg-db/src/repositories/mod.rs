pub mod audit_log_repository;
pub mod session_repository;
pub mod token_blacklist_repository;
pub mod user_repository;
