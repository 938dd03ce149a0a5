pub mod error;
pub mod repositories;

pub use error::{DbError, Result};
pub use repositories::audit_log_repository::AuditLogRepository;
pub use repositories::session_repository::SessionRepository;
pub use repositories::token_blacklist_repository::TokenBlacklistRepository;
pub use repositories::user_repository::UserRepository;
