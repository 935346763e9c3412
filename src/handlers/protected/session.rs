// handlers/protected/session.rs - explicit health check and reconnect

use axum::{extract::State, Extension};
use serde::Serialize;

use crate::access::SessionContext;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub identity: String,
    pub status: &'static str,
}

pub async fn health_get(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<SessionStatus> {
    state.manager.health_check(&ctx).await?;
    Ok(ApiResponse::success(SessionStatus {
        identity: ctx.identity,
        status: "ok",
    }))
}

pub async fn reconnect_post(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<SessionStatus> {
    state.manager.reconnect(&ctx).await?;
    Ok(ApiResponse::success(SessionStatus {
        identity: ctx.identity,
        status: "reconnected",
    }))
}
