// handlers/protected/threats.rs - /api/threat-reports

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::access::SessionContext;
use crate::database::models::{ThreatReport, ThreatReportInput, ThreatReportListing};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::ThreatService;

#[derive(Debug, Deserialize)]
pub struct ThreatFilter {
    pub habitat_id: Option<i32>,
    pub limit: Option<i64>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(filter): Query<ThreatFilter>,
) -> ApiResult<Vec<ThreatReportListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    let service = ThreatService::new(&gw, &ctx);
    let reports = match filter.habitat_id {
        Some(habitat_id) => service.for_habitat(habitat_id).await?,
        None => service.list(filter.limit).await?,
    };
    Ok(ApiResponse::success(reports))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<ThreatReport> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(ThreatService::new(&gw, &ctx).get(id).await?))
}

/// Logged through the stored procedure; the report is dated today.
pub async fn log(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<ThreatReportInput>,
) -> ApiResult<ThreatReportInput> {
    let gw = mutating_gateway(&state, &ctx).await?;
    ThreatService::new(&gw, &ctx).log(&body).await?;
    Ok(ApiResponse::created(body))
}

#[derive(Debug, Deserialize)]
pub struct DescriptionBody {
    pub description: String,
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<DescriptionBody>,
) -> ApiResult<ThreatReport> {
    let gw = mutating_gateway(&state, &ctx).await?;
    let service = ThreatService::new(&gw, &ctx);
    service.update_description(id, &body.description).await?;
    Ok(ApiResponse::success(service.get(id).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    ThreatService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}
