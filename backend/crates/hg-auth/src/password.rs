use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use bcrypt::{DEFAULT_COST, hash, verify};
use error_location::ErrorLocation;

/// Hash a password with bcrypt at the default cost.
#[track_caller]
pub fn hash_password(password: &str) -> AuthErrorResult<String> {
    hash(password, DEFAULT_COST).map_err(|e| AuthError::PasswordHash {
        message: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })
}

/// Verify a password against a stored bcrypt hash.
///
/// A malformed stored hash counts as a failed verification rather than
/// an error; callers treat it exactly like a wrong password.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}
