//! SHA-256 helpers shared by the signed-token generators and the
//! rate-limiter client fingerprint.

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of the input.
pub fn sha256_hex(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Truncated MAC used inside email verification and reset tokens.
/// 16 hex chars (64 bits) keeps tokens short while leaving forgery
/// infeasible for their one-hour to one-day lifetimes.
pub fn sign16(input: &str) -> String {
    let mut mac = sha256_hex(input);
    mac.truncate(16);
    mac
}
