use crate::{ConfigError, ConfigErrorResult, MIN_JWT_SECRET_BYTES};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret; required, at least 32 bytes
    pub jwt_secret: Option<String>,

    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_days: u32,
    /// Refresh/session lifetime when the client asks to be remembered
    pub remember_me_ttl_days: u32,

    pub max_login_attempts: u32,
    pub lockout_minutes: u32,

    pub require_email_verification: bool,
    /// Issue a new refresh token (and retire the old JTI) on every refresh
    pub rotate_refresh_tokens: bool,

    pub verification_token_ttl_hours: u32,
    pub reset_token_ttl_hours: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            access_token_ttl_secs: 900,
            refresh_token_ttl_days: 7,
            remember_me_ttl_days: 30,
            max_login_attempts: 7,
            lockout_minutes: 15,
            require_email_verification: true,
            rotate_refresh_tokens: true,
            verification_token_ttl_hours: 24,
            reset_token_ttl_hours: 1,
        }
    }
}

impl AuthConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        match &self.jwt_secret {
            None => {
                return Err(ConfigError::auth(
                    "auth.jwt_secret is required (set HG_AUTH_JWT_SECRET or config.toml)",
                ));
            }
            Some(secret) if secret.len() < MIN_JWT_SECRET_BYTES => {
                return Err(ConfigError::auth(format!(
                    "auth.jwt_secret must be at least {} bytes, got {}",
                    MIN_JWT_SECRET_BYTES,
                    secret.len()
                )));
            }
            Some(_) => {}
        }

        if self.access_token_ttl_secs == 0 {
            return Err(ConfigError::auth("auth.access_token_ttl_secs must be > 0"));
        }

        if self.refresh_token_ttl_days == 0 || self.remember_me_ttl_days == 0 {
            return Err(ConfigError::auth(
                "auth.refresh_token_ttl_days and auth.remember_me_ttl_days must be > 0",
            ));
        }

        if self.max_login_attempts == 0 {
            return Err(ConfigError::auth("auth.max_login_attempts must be > 0"));
        }

        if self.verification_token_ttl_hours == 0 || self.reset_token_ttl_hours == 0 {
            return Err(ConfigError::auth(
                "auth token lifetimes must be > 0 hours",
            ));
        }

        Ok(())
    }
}
