// handlers/public/auth.rs - POST /auth/login

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::access::Role;
use crate::auth::issue_token;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub identity: String,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub identity: String,
    pub role: Role,
    pub can_mutate: bool,
    pub expires_in: u64,
}

/// Opens a database session as `identity` and returns a bearer token for it.
///
/// Credentials are checked by the database itself; a refused login maps to
/// 403 like any other permission failure.
pub async fn login_post(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let identity = body.identity.trim();
    if identity.is_empty() || body.secret.is_empty() {
        return Err(ApiError::bad_request("identity and secret are required"));
    }

    let ctx = state
        .manager
        .open_session(identity, &body.secret, &state.roles)
        .await
        .map_err(|err| {
            warn!("Login failed for {}: {}", identity, err);
            ApiError::from(err)
        })?;

    let token = match issue_token(&ctx, &state.config.security) {
        Ok(token) => token,
        Err(err) => {
            state.manager.close_session(&ctx).await;
            return Err(err.into());
        }
    };

    info!("{} logged in as {}", ctx.identity, ctx.role);
    Ok(ApiResponse::success(LoginResponse {
        token,
        identity: ctx.identity.clone(),
        role: ctx.role,
        can_mutate: ctx.can_mutate(),
        expires_in: state.config.security.jwt_expiry_hours * 3600,
    }))
}
