// handlers/protected/equipment.rs - /api/equipment, issue and return

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::access::SessionContext;
use crate::database::models::{Equipment, EquipmentInput, EquipmentListing, EquipmentUsage, IssueInput};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::EquipmentService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<EquipmentListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(EquipmentService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Equipment> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(EquipmentService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<EquipmentInput>,
) -> ApiResult<Equipment> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(EquipmentService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<EquipmentInput>,
) -> ApiResult<Equipment> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(EquipmentService::new(&gw, &ctx).update(id, &body).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    EquipmentService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}

pub async fn usages(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<EquipmentUsage>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(EquipmentService::new(&gw, &ctx).usages().await?))
}

pub async fn usage_of(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<EquipmentUsage>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(EquipmentService::new(&gw, &ctx).usage_of(id).await?))
}

/// 409 unless the equipment is Available.
pub async fn issue(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<IssueInput>,
) -> ApiResult<EquipmentUsage> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(EquipmentService::new(&gw, &ctx).issue(id, &body).await?))
}

pub async fn return_item(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((id, ranger_id)): Path<(i32, i32)>,
) -> ApiResult<Equipment> {
    let gw = mutating_gateway(&state, &ctx).await?;
    let service = EquipmentService::new(&gw, &ctx);
    service.return_from(id, ranger_id).await?;
    Ok(ApiResponse::success(service.get(id).await?))
}
