// handlers/protected/organizations.rs - /api/organizations

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::access::SessionContext;
use crate::database::models::{Organization, OrganizationInput};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::OrganizationService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<Organization>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(OrganizationService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Organization> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(OrganizationService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<OrganizationInput>,
) -> ApiResult<Organization> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(OrganizationService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<OrganizationInput>,
) -> ApiResult<Organization> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(OrganizationService::new(&gw, &ctx).update(id, &body).await?))
}

/// 409 while the organization still supplies equipment.
pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    OrganizationService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}
