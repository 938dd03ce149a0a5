use crate::base36;
use crate::signing::sign16;

use hg_core::User;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::RngCore;

const DEFAULT_TTL_HOURS: u32 = 24;

/// Generates and validates email verification tokens.
///
/// Token layout: `{secret}:{base36(timestamp)}:{mac}` where the MAC
/// binds the random secret to the user's id and email. Validation is
/// total: malformed, expired, or tampered input yields `false`.
pub struct EmailVerificationTokens {
    server_secret: String,
    ttl_secs: i64,
}

impl EmailVerificationTokens {
    pub fn new(server_secret: String) -> Self {
        Self::with_ttl_hours(server_secret, DEFAULT_TTL_HOURS)
    }

    pub fn with_ttl_hours(server_secret: String, ttl_hours: u32) -> Self {
        Self {
            server_secret,
            ttl_secs: ttl_hours as i64 * 3600,
        }
    }

    pub fn generate(&self, user: &User) -> String {
        self.generate_at(user, Utc::now().timestamp())
    }

    pub fn validate(&self, user: &User, token: &str) -> bool {
        self.validate_at(user, token, Utc::now().timestamp())
    }

    /// Expiry check without the user, for maintenance sweeps.
    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now().timestamp())
    }

    pub(crate) fn generate_at(&self, user: &User, now: i64) -> String {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        let secret = URL_SAFE_NO_PAD.encode(bytes);

        let mac = self.mac(&secret, user, now);

        format!("{}:{}:{}", secret, base36::encode(now as u64), mac)
    }

    pub(crate) fn validate_at(&self, user: &User, token: &str, now: i64) -> bool {
        let parts: Vec<&str> = token.split(':').collect();
        let [secret, timestamp_b36, mac] = parts.as_slice() else {
            return false;
        };

        let Some(timestamp) = base36::decode(timestamp_b36) else {
            return false;
        };
        let timestamp = timestamp as i64;

        if now - timestamp > self.ttl_secs {
            return false;
        }

        *mac == self.mac(secret, user, timestamp)
    }

    pub(crate) fn is_expired_at(&self, token: &str, now: i64) -> bool {
        let parts: Vec<&str> = token.split(':').collect();
        if parts.len() != 3 {
            return true;
        }

        match base36::decode(parts[1]) {
            Some(timestamp) => now - timestamp as i64 > self.ttl_secs,
            None => true,
        }
    }

    fn mac(&self, secret: &str, user: &User, timestamp: i64) -> String {
        sign16(&format!(
            "{}:{}:{}:{}:{}",
            secret, user.id, user.email, timestamp, self.server_secret
        ))
    }
}
