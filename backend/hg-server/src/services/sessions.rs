use crate::api::extractors::client_meta::ClientMeta;
use crate::services::audit::AuditLogger;

use hg_auth::signing::sha256_hex;
use hg_core::{AuditAction, DeviceInfo, TokenBlacklistEntry, User, UserSession};
use hg_db::{Result as DbErrorResult, SessionRepository, TokenBlacklistRepository};

use chrono::Utc;
use log::warn;
use serde_json::json;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Session lifecycle over the repositories.
///
/// Terminations blacklist the bound refresh JTI best-effort; the session
/// row itself is the authority on whether a refresh is still welcome.
#[derive(Clone)]
pub struct SessionService {
    pool: SqlitePool,
    audit: AuditLogger,
}

impl SessionService {
    pub fn new(pool: SqlitePool, audit: AuditLogger) -> Self {
        Self { pool, audit }
    }

    fn sessions(&self) -> SessionRepository {
        SessionRepository::new(self.pool.clone())
    }

    pub async fn create_session(
        &self,
        user: &User,
        refresh_jti: &str,
        meta: &ClientMeta,
        remember_me: bool,
        ttl_days: u32,
    ) -> DbErrorResult<UserSession> {
        let device = DeviceInfo::parse(&meta.user_agent);
        let session_key = sha256_hex(&format!("{}:{}", Uuid::new_v4(), Utc::now().timestamp()));

        let session = UserSession::new(
            user.id,
            session_key,
            refresh_jti.to_string(),
            device,
            meta.ip_address.clone(),
            meta.user_agent.clone(),
            remember_me,
            ttl_days,
        );

        self.sessions().create(&session).await?;

        self.audit
            .record_for_session(
                user.id,
                AuditAction::SessionCreated,
                session.id,
                meta,
                Some(json!({
                    "device": session.device_summary(),
                    "remember_me": remember_me,
                })),
            )
            .await;

        Ok(session)
    }

    pub async fn find_by_refresh_jti(&self, jti: &str) -> DbErrorResult<Option<UserSession>> {
        self.sessions()
            .find_active_by_refresh_jti(jti, Utc::now().timestamp())
            .await
    }

    pub async fn active_sessions(&self, user_id: Uuid) -> DbErrorResult<Vec<UserSession>> {
        self.sessions()
            .find_active_by_user(user_id, Utc::now().timestamp())
            .await
    }

    pub async fn find_by_id(&self, id: Uuid) -> DbErrorResult<Option<UserSession>> {
        self.sessions().find_by_id(id).await
    }

    /// Idempotent: terminating an already-inactive session reports false
    /// but is not an error.
    pub async fn terminate(
        &self,
        session: &UserSession,
        reason: &str,
        meta: &ClientMeta,
    ) -> DbErrorResult<bool> {
        let terminated = self.sessions().terminate(session.id).await?;

        if terminated {
            self.blacklist_jti(session, reason).await;

            self.audit
                .record_for_session(
                    session.user_id,
                    AuditAction::SessionTerminated,
                    session.id,
                    meta,
                    Some(json!({ "reason": reason })),
                )
                .await;
        }

        Ok(terminated)
    }

    /// Terminate every active session for a user except, optionally, one.
    pub async fn terminate_all(
        &self,
        user_id: Uuid,
        except: Option<Uuid>,
        reason: &str,
        meta: &ClientMeta,
    ) -> DbErrorResult<u64> {
        let active = self.active_sessions(user_id).await?;

        let mut terminated = 0;
        for session in active {
            if Some(session.id) == except {
                continue;
            }
            if self.terminate(&session, reason, meta).await? {
                terminated += 1;
            }
        }

        Ok(terminated)
    }

    /// Swap the session's refresh JTI, guarded by the old one. Extends
    /// expiry for remember-me sessions. Returns false when the old JTI
    /// was already consumed.
    pub async fn rotate_refresh(
        &self,
        session: &UserSession,
        new_jti: &str,
        new_expires_at: Option<i64>,
    ) -> DbErrorResult<bool> {
        self.sessions()
            .rotate_refresh(
                session.id,
                &session.refresh_jti,
                new_jti,
                new_expires_at,
                Utc::now().timestamp(),
            )
            .await
    }

    pub async fn touch(&self, session_id: Uuid) -> DbErrorResult<()> {
        self.sessions()
            .touch(session_id, Utc::now().timestamp())
            .await
    }

    /// Best-effort revocation of the refresh token bound to a session.
    pub async fn blacklist_jti(&self, session: &UserSession, reason: &str) {
        let entry = TokenBlacklistEntry::new(
            session.refresh_jti.clone(),
            session.user_id,
            session.expires_at,
        )
        .with_reason(reason.to_string());

        if let Err(e) = TokenBlacklistRepository::new(self.pool.clone())
            .insert(&entry)
            .await
        {
            warn!(
                "Failed to blacklist refresh JTI for session {}: {}",
                session.id, e
            );
        }
    }
}
