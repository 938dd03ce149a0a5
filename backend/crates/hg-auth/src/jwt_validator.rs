use crate::{
    AuthError, Claims, Result as AuthErrorResult, TOKEN_USE_ACCESS, TOKEN_USE_REFRESH,
};

use std::panic::Location;

use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

/// Validates HS256 tokens and enforces the expected token_use.
pub struct JwtValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtValidator {
    pub fn with_hs256(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 30; // 30 second clock skew tolerance
        validation.set_required_spec_claims(&["exp", "sub", "jti"]);

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Validate a JWT and return its claims, regardless of token_use.
    #[track_caller]
    pub fn validate(&self, token: &str) -> AuthErrorResult<Claims> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                use jsonwebtoken::errors::ErrorKind;
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired {
                        location: ErrorLocation::from(Location::caller()),
                    },
                    _ => AuthError::JwtDecode {
                        source: e,
                        location: ErrorLocation::from(Location::caller()),
                    },
                }
            })?;

        token_data.claims.validate()?;

        Ok(token_data.claims)
    }

    /// Validate an access token; refresh tokens are rejected here.
    #[track_caller]
    pub fn validate_access(&self, token: &str) -> AuthErrorResult<Claims> {
        self.validate_expecting(token, TOKEN_USE_ACCESS)
    }

    /// Validate a refresh token; access tokens are rejected here.
    #[track_caller]
    pub fn validate_refresh(&self, token: &str) -> AuthErrorResult<Claims> {
        self.validate_expecting(token, TOKEN_USE_REFRESH)
    }

    #[track_caller]
    fn validate_expecting(&self, token: &str, expected_use: &str) -> AuthErrorResult<Claims> {
        let claims = self.validate(token)?;

        if claims.token_use != expected_use {
            return Err(AuthError::InvalidToken {
                message: format!(
                    "expected {} token, got {}",
                    expected_use, claims.token_use
                ),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(claims)
    }
}
