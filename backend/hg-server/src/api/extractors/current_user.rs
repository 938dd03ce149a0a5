//! Axum extractors for REST API authentication

use crate::{ApiError, AppState};

use hg_auth::{AuthError, Claims};
use hg_core::User;
use hg_db::{TokenBlacklistRepository, UserRepository};

use std::future::Future;

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

/// The authenticated caller, resolved from a Bearer access token.
///
/// Rejects missing/malformed headers, refresh tokens, blacklisted JTIs,
/// and inactive accounts with 401.
pub struct CurrentUser {
    pub user: User,
    pub claims: Claims,
}

impl CurrentUser {
    /// Session id carried by the access token, when bound to one.
    pub fn session_id(&self) -> Option<Uuid> {
        self.claims
            .sid
            .as_deref()
            .and_then(|sid| Uuid::parse_str(sid).ok())
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    #[allow(clippy::manual_async_fn)]
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl Future<Output = Result<Self, Self::Rejection>> + Send {
        async move {
            let header = parts
                .headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(AuthError::missing_header)?;

            let token = header
                .strip_prefix("Bearer ")
                .ok_or_else(AuthError::invalid_scheme)?;

            let claims = state.jwt_validator.validate_access(token)?;

            let blacklist = TokenBlacklistRepository::new(state.pool.clone());
            if blacklist.contains(&claims.jti).await? {
                return Err(ApiError::unauthorized(
                    "TOKEN_REVOKED",
                    "This token has been revoked.",
                ));
            }

            let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
                ApiError::unauthorized("INVALID_TOKEN", "Token subject is not a valid user id.")
            })?;

            let user = UserRepository::new(state.pool.clone())
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| ApiError::unauthorized("INVALID_TOKEN", "Unknown user."))?;

            if !user.is_active {
                return Err(ApiError::unauthorized(
                    "ACCOUNT_INACTIVE",
                    "This account has been deactivated.",
                ));
            }

            Ok(CurrentUser { user, claims })
        }
    }
}
