use crate::base36;
use crate::signing::sign16;

use hg_core::User;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;

const DEFAULT_TTL_HOURS: u32 = 1;
const SALT_LEN: usize = 12;

/// Generates and validates password reset tokens.
///
/// The base token is `{salt}-{mac}` where the MAC binds a per-use salt
/// to the user's id, email, and current password hash, so changing the
/// password invalidates every outstanding token. New tokens append a
/// `:{base36(timestamp)}` segment for expiry.
///
/// Tokens without a timestamp segment are a compatibility mode for
/// links issued before expiry tracking existed: they validate against
/// the base MAC only, and `is_expired` judges them by length alone.
pub struct PasswordResetTokens {
    server_secret: String,
    ttl_secs: i64,
}

impl PasswordResetTokens {
    pub fn new(server_secret: String) -> Self {
        Self::with_ttl_hours(server_secret, DEFAULT_TTL_HOURS)
    }

    pub fn with_ttl_hours(server_secret: String, ttl_hours: u32) -> Self {
        Self {
            server_secret,
            ttl_secs: ttl_hours as i64 * 3600,
        }
    }

    /// Generate a token and its explicit expiry time.
    pub fn generate(&self, user: &User) -> (String, DateTime<Utc>) {
        let now = Utc::now();
        let token = self.generate_at(user, now.timestamp());
        (token, now + Duration::seconds(self.ttl_secs))
    }

    pub fn validate(&self, user: &User, token: &str) -> bool {
        self.validate_at(user, token, Utc::now().timestamp())
    }

    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, Utc::now().timestamp())
    }

    pub(crate) fn generate_at(&self, user: &User, now: i64) -> String {
        let salt: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(SALT_LEN)
            .map(char::from)
            .collect();

        let mac = self.mac(&salt, user);

        format!("{}-{}:{}", salt, mac, base36::encode(now as u64))
    }

    pub(crate) fn validate_at(&self, user: &User, token: &str, now: i64) -> bool {
        let Some((base, timestamp_b36)) = token.rsplit_once(':') else {
            // Legacy token without expiry segment
            return self.check_base(user, token);
        };

        let Some(timestamp) = base36::decode(timestamp_b36) else {
            return false;
        };

        if now - timestamp as i64 > self.ttl_secs {
            return false;
        }

        self.check_base(user, base)
    }

    pub(crate) fn is_expired_at(&self, token: &str, now: i64) -> bool {
        let Some((_, timestamp_b36)) = token.rsplit_once(':') else {
            // Legacy tokens carry no timestamp; too-short input is garbage
            return token.len() < 10;
        };

        match base36::decode(timestamp_b36) {
            Some(timestamp) => now - timestamp as i64 > self.ttl_secs,
            None => true,
        }
    }

    fn check_base(&self, user: &User, base: &str) -> bool {
        let Some((salt, mac)) = base.split_once('-') else {
            return false;
        };

        mac == self.mac(salt, user)
    }

    fn mac(&self, salt: &str, user: &User) -> String {
        sign16(&format!(
            "{}:{}:{}:{}:{}",
            salt, user.id, user.email, user.password_hash, self.server_secret
        ))
    }
}
