use crate::{
    AuthError, Claims, IssuedToken, Result as AuthErrorResult, TOKEN_USE_ACCESS, TOKEN_USE_REFRESH,
};

use std::panic::Location;

use chrono::Utc;
use error_location::ErrorLocation;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use uuid::Uuid;

/// Signs HS256 access and refresh tokens with fresh JTIs.
pub struct JwtIssuer {
    encoding_key: EncodingKey,
}

impl JwtIssuer {
    pub fn with_hs256(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
        }
    }

    #[track_caller]
    pub fn access_token(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        ttl_secs: u64,
    ) -> AuthErrorResult<IssuedToken> {
        self.issue(user_id, session_id, TOKEN_USE_ACCESS, ttl_secs)
    }

    #[track_caller]
    pub fn refresh_token(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        ttl_secs: u64,
    ) -> AuthErrorResult<IssuedToken> {
        self.issue(user_id, session_id, TOKEN_USE_REFRESH, ttl_secs)
    }

    #[track_caller]
    fn issue(
        &self,
        user_id: Uuid,
        session_id: Option<Uuid>,
        token_use: &str,
        ttl_secs: u64,
    ) -> AuthErrorResult<IssuedToken> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            token_use: token_use.to_string(),
            sid: session_id.map(|id| id.to_string()),
            exp: now + ttl_secs as i64,
            iat: now,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding_key,
        )
        .map_err(|e| AuthError::JwtEncode {
            source: e,
            location: ErrorLocation::from(Location::caller()),
        })?;

        Ok(IssuedToken { token, claims })
    }
}
