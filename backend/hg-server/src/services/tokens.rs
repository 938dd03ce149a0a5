use crate::api::extractors::client_meta::ClientMeta;
use crate::services::audit::AuditLogger;
use crate::services::sessions::SessionService;
use crate::{ApiResult, AppState};

use hg_core::{AuditAction, User, UserSession};
use hg_db::TokenBlacklistRepository;

use std::sync::Arc;

use chrono::{Duration, Utc};
use hg_auth::{JwtIssuer, JwtValidator};
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

const SECS_PER_DAY: u64 = 86_400;

/// An access/refresh pair with its freshly created session.
pub struct TokenBundle {
    pub access: String,
    pub refresh: String,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
    pub session: UserSession,
}

/// Result of a successful refresh.
pub struct RefreshBundle {
    pub access: String,
    pub refresh: String,
    pub expires_in: u64,
    pub session_id: Uuid,
}

/// Token lifecycle: issue, refresh (with rotation), logout.
pub struct TokenService {
    pool: SqlitePool,
    issuer: Arc<JwtIssuer>,
    validator: Arc<JwtValidator>,
    config: Arc<hg_config::Config>,
    sessions: SessionService,
    audit: AuditLogger,
}

impl TokenService {
    pub fn from_state(state: &AppState) -> Self {
        let audit = AuditLogger::new(state.pool.clone());
        Self {
            pool: state.pool.clone(),
            issuer: state.jwt_issuer.clone(),
            validator: state.jwt_validator.clone(),
            config: state.config.clone(),
            sessions: SessionService::new(state.pool.clone(), audit.clone()),
            audit,
        }
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    /// Issue a fresh access/refresh pair and bind a new session to the
    /// refresh token's JTI.
    pub async fn issue(
        &self,
        user: &User,
        meta: &ClientMeta,
        remember_me: bool,
    ) -> ApiResult<TokenBundle> {
        let auth = &self.config.auth;
        let ttl_days = if remember_me {
            auth.remember_me_ttl_days
        } else {
            auth.refresh_token_ttl_days
        };
        let refresh_ttl_secs = ttl_days as u64 * SECS_PER_DAY;

        let refresh = self.issuer.refresh_token(user.id, None, refresh_ttl_secs)?;

        let session = self
            .sessions
            .create_session(user, refresh.jti(), meta, remember_me, ttl_days)
            .await?;

        let access = self
            .issuer
            .access_token(user.id, Some(session.id), auth.access_token_ttl_secs)?;

        Ok(TokenBundle {
            access: access.token,
            refresh: refresh.token,
            expires_in: auth.access_token_ttl_secs,
            refresh_expires_in: refresh_ttl_secs,
            session,
        })
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Returns `None` when the token is invalid, revoked, or no longer
    /// bound to an active session; callers map that to 401. With
    /// rotation enabled the old JTI is retired and a concurrent replay
    /// of it fails closed.
    pub async fn refresh(
        &self,
        refresh_token: &str,
        meta: &ClientMeta,
    ) -> ApiResult<Option<RefreshBundle>> {
        let Ok(claims) = self.validator.validate_refresh(refresh_token) else {
            return Ok(None);
        };

        if TokenBlacklistRepository::new(self.pool.clone())
            .contains(&claims.jti)
            .await?
        {
            return Ok(None);
        }

        let Some(session) = self.sessions.find_by_refresh_jti(&claims.jti).await? else {
            return Ok(None);
        };

        let user_id = session.user_id;
        let auth = &self.config.auth;

        if meta.ip_address != session.ip_address {
            self.audit
                .record_for_session(
                    user_id,
                    AuditAction::IpChange,
                    session.id,
                    meta,
                    Some(json!({ "previous_ip": session.ip_address })),
                )
                .await;
        }

        let access = self
            .issuer
            .access_token(user_id, Some(session.id), auth.access_token_ttl_secs)?;

        let refresh_out = if auth.rotate_refresh_tokens {
            let ttl_days = if session.remember_me {
                auth.remember_me_ttl_days
            } else {
                auth.refresh_token_ttl_days
            };
            let refresh_ttl_secs = ttl_days as u64 * SECS_PER_DAY;

            let new_refresh = self
                .issuer
                .refresh_token(user_id, Some(session.id), refresh_ttl_secs)?;

            // Remember-me sessions slide their expiry forward on use
            let new_expires_at = session
                .remember_me
                .then(|| (Utc::now() + Duration::days(ttl_days as i64)).timestamp());

            let rotated = self
                .sessions
                .rotate_refresh(&session, new_refresh.jti(), new_expires_at)
                .await?;
            if !rotated {
                return Ok(None);
            }

            self.sessions.blacklist_jti(&session, "rotated").await;

            new_refresh.token
        } else {
            self.sessions.touch(session.id).await?;
            refresh_token.to_string()
        };

        self.audit
            .record_for_session(
                user_id,
                AuditAction::TokenRefreshed,
                session.id,
                meta,
                Some(json!({ "rotated": auth.rotate_refresh_tokens })),
            )
            .await;

        Ok(Some(RefreshBundle {
            access: access.token,
            refresh: refresh_out,
            expires_in: auth.access_token_ttl_secs,
            session_id: session.id,
        }))
    }

    /// Terminate the session bound to a refresh token. Never errors to
    /// the caller; an unusable token simply reports false.
    pub async fn logout(&self, refresh_token: &str, meta: &ClientMeta) -> bool {
        let Ok(claims) = self.validator.validate_refresh(refresh_token) else {
            return false;
        };

        let session = match self.sessions.find_by_refresh_jti(&claims.jti).await {
            Ok(Some(session)) => session,
            _ => return false,
        };

        self.sessions
            .terminate(&session, "logout", meta)
            .await
            .unwrap_or(false)
    }
}
