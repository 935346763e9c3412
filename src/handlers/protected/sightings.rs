// handlers/protected/sightings.rs - /api/sightings and animal links

use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::access::SessionContext;
use crate::database::models::{
    Sighting, SightingDetail, SightingDetailInput, SightingDetailListing, SightingInput, SightingListing,
};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SightingService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<SightingListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SightingService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Sighting> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SightingService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<SightingInput>,
) -> ApiResult<Sighting> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(SightingService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<SightingInput>,
) -> ApiResult<Sighting> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SightingService::new(&gw, &ctx).update(id, &body).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    SightingService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}

pub async fn details_all(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<SightingDetailListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SightingService::new(&gw, &ctx).all_details().await?))
}

pub async fn details(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<SightingDetailListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SightingService::new(&gw, &ctx).details(id).await?))
}

/// 409 when the animal is currently Sick.
pub async fn detail_add(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<SightingDetailInput>,
) -> ApiResult<SightingDetail> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(SightingService::new(&gw, &ctx).add_detail(id, &body).await?))
}

pub async fn detail_remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<SightingDetailInput>,
) -> ApiResult<SightingDetailInput> {
    let gw = mutating_gateway(&state, &ctx).await?;
    SightingService::new(&gw, &ctx).remove_detail(id, &body).await?;
    Ok(ApiResponse::success(body))
}
