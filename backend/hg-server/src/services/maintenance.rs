use crate::AppState;

use hg_db::{AuditLogRepository, SessionRepository, TokenBlacklistRepository, UserRepository};

use std::time::Duration;

use chrono::Utc;
use log::{info, warn};

const SECS_PER_HOUR: u64 = 3_600;
const SECS_PER_DAY: i64 = 86_400;

/// Spawn the background sweeps: expired sessions, stale audit entries,
/// spent blacklist rows, lapsed account locks, and limiter bookkeeping.
pub fn spawn(state: &AppState) {
    let session_interval =
        Duration::from_secs(state.config.session.cleanup_interval_hours as u64 * SECS_PER_HOUR);
    let audit_interval =
        Duration::from_secs(state.config.audit_log.cleanup_interval_hours as u64 * SECS_PER_HOUR);

    state.rate_limiter.start_cleanup_task(Duration::from_secs(300));

    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(session_interval);
            loop {
                ticker.tick().await;
                sweep_sessions(&state).await;
            }
        });
    }

    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(audit_interval);
            loop {
                ticker.tick().await;
                sweep_audit_log(&state).await;
            }
        });
    }
}

async fn sweep_sessions(state: &AppState) {
    let now = Utc::now().timestamp();
    let sessions = SessionRepository::new(state.pool.clone());

    match sessions.terminate_expired(now).await {
        Ok(n) if n > 0 => info!("Terminated {} expired sessions", n),
        Ok(_) => {}
        Err(e) => warn!("Expired-session sweep failed: {}", e),
    }

    let prune_cutoff = now - state.config.session.inactive_prune_days as i64 * SECS_PER_DAY;
    match sessions.delete_inactive_before(prune_cutoff).await {
        Ok(n) if n > 0 => info!("Pruned {} inactive session rows", n),
        Ok(_) => {}
        Err(e) => warn!("Inactive-session prune failed: {}", e),
    }

    match TokenBlacklistRepository::new(state.pool.clone())
        .delete_expired(now)
        .await
    {
        Ok(n) if n > 0 => info!("Dropped {} expired blacklist entries", n),
        Ok(_) => {}
        Err(e) => warn!("Blacklist sweep failed: {}", e),
    }

    match UserRepository::new(state.pool.clone())
        .clear_expired_locks(now)
        .await
    {
        Ok(n) if n > 0 => info!("Cleared {} lapsed account locks", n),
        Ok(_) => {}
        Err(e) => warn!("Account-lock sweep failed: {}", e),
    }
}

async fn sweep_audit_log(state: &AppState) {
    let cutoff =
        Utc::now().timestamp() - state.config.audit_log.retention_days as i64 * SECS_PER_DAY;

    match AuditLogRepository::new(state.pool.clone())
        .delete_older_than(cutoff)
        .await
    {
        Ok(n) if n > 0 => info!("Purged {} audit entries past retention", n),
        Ok(_) => {}
        Err(e) => warn!("Audit retention sweep failed: {}", e),
    }
}
