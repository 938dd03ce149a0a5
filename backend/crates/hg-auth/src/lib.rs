pub mod base36;
pub mod claims;
pub mod client_fingerprint;
pub mod email_verification_tokens;
pub mod error;
pub mod issued_token;
pub mod jwt_issuer;
pub mod jwt_validator;
pub mod password;
pub mod password_reset_tokens;
pub mod rate_limit_decision;
pub mod rate_limit_policy;
pub mod signing;
pub mod sliding_window_limiter;

pub use claims::{Claims, TOKEN_USE_ACCESS, TOKEN_USE_REFRESH};
pub use client_fingerprint::client_fingerprint;
pub use email_verification_tokens::EmailVerificationTokens;
pub use error::{AuthError, Result};
pub use issued_token::IssuedToken;
pub use jwt_issuer::JwtIssuer;
pub use jwt_validator::JwtValidator;
pub use password::{hash_password, verify_password};
pub use password_reset_tokens::PasswordResetTokens;
pub use rate_limit_decision::RateLimitDecision;
pub use rate_limit_policy::RateLimitPolicy;
pub use sliding_window_limiter::SlidingWindowLimiter;

#[cfg(test)]
mod tests;
