// handlers/protected/rangers.rs - /api/rangers and habitat assignments

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::access::SessionContext;
use crate::database::models::{Assignment, AssignmentInput, Ranger, RangerInput};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::RangerService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<Ranger>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(RangerService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Ranger> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(RangerService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<RangerInput>,
) -> ApiResult<Ranger> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(RangerService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<RangerInput>,
) -> ApiResult<Ranger> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(RangerService::new(&gw, &ctx).update(id, &body).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    RangerService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}

pub async fn assignments_all(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<Assignment>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(RangerService::new(&gw, &ctx).all_assignments().await?))
}

pub async fn assignments(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<Assignment>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(RangerService::new(&gw, &ctx).assignments(id).await?))
}

pub async fn assign(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<AssignmentInput>,
) -> ApiResult<Assignment> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(RangerService::new(&gw, &ctx).assign(id, &body).await?))
}

pub async fn unassign(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((id, habitat_id)): Path<(i32, i32)>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    RangerService::new(&gw, &ctx).unassign(id, habitat_id).await?;
    Ok(ApiResponse::success(habitat_id))
}
