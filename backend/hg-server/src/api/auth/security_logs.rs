//! Security audit log handler

use crate::{ApiResult, AppState, CurrentUser, SecurityLogDto, SecurityLogListResponse};

use hg_db::AuditLogRepository;

use axum::{Json, extract::State};

const LOG_PAGE_SIZE: u32 = 50;

/// GET /api/v1/auth/security-logs
///
/// The caller's last 50 audit entries, newest first.
pub async fn list_security_logs(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Json<SecurityLogListResponse>> {
    let logs = AuditLogRepository::new(state.pool.clone())
        .find_recent_by_user(current.user.id, LOG_PAGE_SIZE)
        .await?
        .into_iter()
        .map(SecurityLogDto::from)
        .collect();

    Ok(Json(SecurityLogListResponse { logs }))
}
