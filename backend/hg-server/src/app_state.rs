use crate::mailer::Mailer;

use hg_auth::{
    EmailVerificationTokens, JwtIssuer, JwtValidator, PasswordResetTokens, SlidingWindowLimiter,
};

use std::sync::Arc;

use sqlx::SqlitePool;

/// Shared state for every handler and middleware layer.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub jwt_issuer: Arc<JwtIssuer>,
    pub jwt_validator: Arc<JwtValidator>,
    pub verification_tokens: Arc<EmailVerificationTokens>,
    pub reset_tokens: Arc<PasswordResetTokens>,
    pub rate_limiter: Arc<SlidingWindowLimiter>,
    pub mailer: Mailer,
    pub config: Arc<hg_config::Config>,
}

impl AppState {
    /// Wire up state from validated configuration.
    ///
    /// Panics if `auth.jwt_secret` is missing; `Config::validate()` runs
    /// before this in main and in every test harness.
    pub fn new(pool: SqlitePool, config: hg_config::Config, mailer: Mailer) -> Self {
        let secret = config
            .auth
            .jwt_secret
            .clone()
            .unwrap_or_else(|| unreachable!("validate() ensures auth.jwt_secret is set"));

        let policies = config
            .rate_limit
            .endpoints()
            .into_iter()
            .map(|(name, limit)| {
                (
                    name.to_string(),
                    hg_auth::RateLimitPolicy {
                        max_requests: limit.max_requests,
                        window_secs: limit.window_secs,
                        block_secs: limit.block_secs,
                    },
                )
            })
            .collect();

        Self {
            pool,
            jwt_issuer: Arc::new(JwtIssuer::with_hs256(secret.as_bytes())),
            jwt_validator: Arc::new(JwtValidator::with_hs256(secret.as_bytes())),
            verification_tokens: Arc::new(EmailVerificationTokens::with_ttl_hours(
                secret.clone(),
                config.auth.verification_token_ttl_hours,
            )),
            reset_tokens: Arc::new(PasswordResetTokens::with_ttl_hours(
                secret,
                config.auth.reset_token_ttl_hours,
            )),
            rate_limiter: Arc::new(SlidingWindowLimiter::new(
                config.rate_limit.enabled,
                policies,
            )),
            mailer,
            config: Arc::new(config),
        }
    }
}
