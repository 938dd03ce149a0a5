use crate::{
    AuditLogConfig, AuthConfig, ConfigError, ConfigErrorResult, DatabaseConfig, LoggingConfig,
    RateLimitConfig, ServerConfig, SessionConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub rate_limit: RateLimitConfig,
    pub session: SessionConfig,
    pub audit_log: AuditLogConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config with full production error handling.
    ///
    /// Loading order:
    /// 1. Check for HG_CONFIG_DIR env var, else use ./.hg/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply HG_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// Load and parse TOML file with detailed error context.
    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: HG_CONFIG_DIR env var > ./.hg/ (relative to cwd)
    pub fn config_dir() -> Result<PathBuf, ConfigError> {
        if let Ok(dir) = std::env::var("HG_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".hg"))
    }

    /// Validate all configuration.
    /// Call after load() to catch all errors at startup.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.server.validate()?;
        self.auth.validate()?;
        self.rate_limit.validate()?;

        // Validate database path doesn't escape config dir
        let db_path = std::path::Path::new(&self.database.path);
        if db_path.is_absolute() || self.database.path.contains("..") {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> Result<PathBuf, ConfigError> {
        let config_dir = Self::config_dir()?;
        Ok(config_dir.join(&self.database.path))
    }

    /// Get bind address as string.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Log configuration summary (NEVER logs secrets).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  server: {}:{} (max {} connections)",
            self.server.host, self.server.port, self.server.max_connections
        );
        info!("  database: {}", self.database.path);

        info!(
            "  auth: jwt_secret={}, access_ttl={}s, refresh_ttl={}d/{}d, lockout={}@{}m",
            if self.auth.jwt_secret.is_some() {
                "set"
            } else {
                "MISSING"
            },
            self.auth.access_token_ttl_secs,
            self.auth.refresh_token_ttl_days,
            self.auth.remember_me_ttl_days,
            self.auth.max_login_attempts,
            self.auth.lockout_minutes
        );

        info!(
            "  auth: email_verification={}, refresh_rotation={}",
            if self.auth.require_email_verification {
                "required"
            } else {
                "optional"
            },
            if self.auth.rotate_refresh_tokens {
                "on"
            } else {
                "off"
            }
        );

        if self.rate_limit.enabled {
            for (name, limit) in self.rate_limit.endpoints() {
                info!(
                    "  rate_limit.{}: {}/{}s (block {}s)",
                    name, limit.max_requests, limit.window_secs, limit.block_secs
                );
            }
        } else {
            info!("  rate_limit: disabled");
        }

        info!(
            "  audit_log: retention={}d, cleanup={}h",
            self.audit_log.retention_days, self.audit_log.cleanup_interval_hours
        );

        info!(
            "  session: cleanup={}h, prune_inactive={}d",
            self.session.cleanup_interval_hours, self.session.inactive_prune_days
        );

        info!(
            "  logging: {} (colored: {})",
            *self.logging.level, self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Server
        Self::apply_env_string("HG_SERVER_HOST", &mut self.server.host);
        Self::apply_env_parse("HG_SERVER_PORT", &mut self.server.port);
        Self::apply_env_parse(
            "HG_SERVER_MAX_CONNECTIONS",
            &mut self.server.max_connections,
        );

        // Database
        Self::apply_env_string("HG_DATABASE_PATH", &mut self.database.path);

        // Auth
        Self::apply_env_option_string("HG_AUTH_JWT_SECRET", &mut self.auth.jwt_secret);
        Self::apply_env_parse(
            "HG_AUTH_ACCESS_TOKEN_TTL_SECS",
            &mut self.auth.access_token_ttl_secs,
        );
        Self::apply_env_parse(
            "HG_AUTH_REFRESH_TOKEN_TTL_DAYS",
            &mut self.auth.refresh_token_ttl_days,
        );
        Self::apply_env_parse(
            "HG_AUTH_REMEMBER_ME_TTL_DAYS",
            &mut self.auth.remember_me_ttl_days,
        );
        Self::apply_env_parse(
            "HG_AUTH_MAX_LOGIN_ATTEMPTS",
            &mut self.auth.max_login_attempts,
        );
        Self::apply_env_parse("HG_AUTH_LOCKOUT_MINUTES", &mut self.auth.lockout_minutes);
        Self::apply_env_bool(
            "HG_AUTH_REQUIRE_EMAIL_VERIFICATION",
            &mut self.auth.require_email_verification,
        );
        Self::apply_env_bool(
            "HG_AUTH_ROTATE_REFRESH_TOKENS",
            &mut self.auth.rotate_refresh_tokens,
        );
        Self::apply_env_parse(
            "HG_AUTH_VERIFICATION_TOKEN_TTL_HOURS",
            &mut self.auth.verification_token_ttl_hours,
        );
        Self::apply_env_parse(
            "HG_AUTH_RESET_TOKEN_TTL_HOURS",
            &mut self.auth.reset_token_ttl_hours,
        );

        // Rate limit (per-endpoint limits are TOML-only)
        Self::apply_env_bool("HG_RATE_LIMIT_ENABLED", &mut self.rate_limit.enabled);

        // Session maintenance
        Self::apply_env_parse(
            "HG_SESSION_CLEANUP_INTERVAL_HOURS",
            &mut self.session.cleanup_interval_hours,
        );
        Self::apply_env_parse(
            "HG_SESSION_INACTIVE_PRUNE_DAYS",
            &mut self.session.inactive_prune_days,
        );

        // Audit log
        Self::apply_env_parse(
            "HG_AUDIT_LOG_RETENTION_DAYS",
            &mut self.audit_log.retention_days,
        );
        Self::apply_env_parse(
            "HG_AUDIT_LOG_CLEANUP_INTERVAL_HOURS",
            &mut self.audit_log.cleanup_interval_hours,
        );

        // Logging
        Self::apply_env_parse("HG_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("HG_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("HG_LOG_FILE", &mut self.logging.file);
    }

    /// Helper: Apply environment variable override for String values
    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Helper: Apply environment variable override for bool values (accepts "true"/"1")
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    /// Helper: Apply environment variable override for parseable values
    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    /// Helper: Apply environment variable override for Option<String> values
    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
