// handlers/protected/auth.rs - whoami and logout

use axum::{extract::State, Extension};
use serde::Serialize;
use uuid::Uuid;

use crate::access::{Role, SessionContext};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct WhoAmI {
    pub session_id: Uuid,
    pub identity: String,
    pub role: Role,
    pub can_mutate: bool,
    pub active: bool,
}

pub async fn whoami_get(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<WhoAmI> {
    let active = state.manager.gateway(&ctx).await.is_ok();
    Ok(ApiResponse::success(WhoAmI {
        session_id: ctx.session_id,
        can_mutate: ctx.can_mutate(),
        identity: ctx.identity,
        role: ctx.role,
        active,
    }))
}

#[derive(Debug, Serialize)]
pub struct LoggedOut {
    pub closed: bool,
}

/// Closes the session pool; the token stops working for data routes.
pub async fn logout_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<LoggedOut> {
    let closed = state.manager.close_session(&ctx).await;
    Ok(ApiResponse::success(LoggedOut { closed }))
}
