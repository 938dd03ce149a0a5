mod audit_log_config;
mod auth_config;
mod config;
mod database_config;
mod endpoint_limit;
mod error;
mod log_level;
mod logging_config;
mod rate_limit_config;
mod server_config;
mod session_config;

pub use audit_log_config::AuditLogConfig;
pub use auth_config::AuthConfig;
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use endpoint_limit::EndpointLimit;
pub use error::{ConfigError, ConfigErrorResult};
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;
pub use rate_limit_config::RateLimitConfig;
pub use server_config::ServerConfig;
pub use session_config::SessionConfig;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;
const MIN_PORT: u16 = 1024;
const DEFAULT_MAX_CONNECTIONS: usize = 100;
const MIN_MAX_CONNECTIONS: usize = 1;
const MAX_MAX_CONNECTIONS: usize = 10_000;
const DEFAULT_DATABASE_FILENAME: &str = "health.db";
const DEFAULT_LOG_LEVEL_STRING: &str = "info";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";
const MIN_JWT_SECRET_BYTES: usize = 32;

#[cfg(test)]
mod tests;
