use crate::{ConfigError, ConfigErrorResult, EndpointLimit};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,

    pub login: EndpointLimit,
    pub register: EndpointLimit,
    pub password_reset: EndpointLimit,
    pub email_verification: EndpointLimit,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            login: EndpointLimit::new(10, 900, 900),
            register: EndpointLimit::new(5, 3600, 3600),
            password_reset: EndpointLimit::new(3, 3600, 3600),
            email_verification: EndpointLimit::new(10, 3600, 1800),
        }
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for (name, limit) in self.endpoints() {
            if limit.max_requests == 0 {
                return Err(ConfigError::rate_limit(format!(
                    "rate_limit.{}.max_requests must be > 0",
                    name
                )));
            }
            if limit.window_secs == 0 || limit.block_secs == 0 {
                return Err(ConfigError::rate_limit(format!(
                    "rate_limit.{}.window_secs and block_secs must be > 0",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Named endpoint limits, in the keys the limiter is consulted with.
    pub fn endpoints(&self) -> [(&'static str, EndpointLimit); 4] {
        [
            ("login", self.login),
            ("register", self.register),
            ("password_reset", self.password_reset),
            ("email_verification", self.email_verification),
        ]
    }
}
