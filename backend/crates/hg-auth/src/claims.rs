use crate::{AuthError, Result as AuthErrorResult};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

pub const TOKEN_USE_ACCESS: &str = "access";
pub const TOKEN_USE_REFRESH: &str = "refresh";

/// JWT claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    /// Unique token identifier, used for revocation
    pub jti: String,
    /// "access" or "refresh"
    pub token_use: String,
    /// Session this token is bound to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
    /// Expiration timestamp (Unix)
    pub exp: i64,
    /// Issued at timestamp (Unix)
    pub iat: i64,
}

impl Claims {
    /// Validate claims after JWT signature verification
    #[track_caller]
    pub fn validate(&self) -> AuthErrorResult<()> {
        if self.sub.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "sub".to_string(),
                message: "sub (user id) cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.jti.is_empty() {
            return Err(AuthError::InvalidClaim {
                claim: "jti".to_string(),
                message: "jti cannot be empty".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if self.token_use != TOKEN_USE_ACCESS && self.token_use != TOKEN_USE_REFRESH {
            return Err(AuthError::InvalidClaim {
                claim: "token_use".to_string(),
                message: format!("unknown token_use '{}'", self.token_use),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(())
    }
}
