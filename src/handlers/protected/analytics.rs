// handlers/protected/analytics.rs - dashboard aggregates

use axum::{
    extract::{Query, State},
    Extension,
};
use serde::Deserialize;

use crate::access::SessionContext;
use crate::database::models::ThreatReportListing;
use crate::handlers::protected::session_gateway;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::analytics::{Dashboard, DailySightings, HabitatSpeciesCount, LabelCount, RangerSummary, Totals};
use crate::services::AnalyticsService;

#[derive(Debug, Default, Deserialize)]
pub struct Window {
    pub limit: Option<i64>,
    pub days: Option<i64>,
}

pub async fn dashboard(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(window): Query<Window>,
) -> ApiResult<Dashboard> {
    let gw = session_gateway(&state, &ctx).await?;
    let limit = window.limit.unwrap_or(state.config.api.recent_threat_limit);
    Ok(ApiResponse::success(AnalyticsService::new(&gw).dashboard(limit).await?))
}

pub async fn totals(State(state): State<AppState>, Extension(ctx): Extension<SessionContext>) -> ApiResult<Totals> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).totals().await?))
}

pub async fn recent_threats(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(window): Query<Window>,
) -> ApiResult<Vec<ThreatReportListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    let limit = window.limit.unwrap_or(state.config.api.recent_threat_limit);
    Ok(ApiResponse::success(AnalyticsService::new(&gw).recent_threats(limit).await?))
}

pub async fn conservation_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<LabelCount>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).conservation_status().await?))
}

pub async fn health_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<LabelCount>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).health_status().await?))
}

pub async fn threat_levels(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<LabelCount>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).threat_levels().await?))
}

pub async fn equipment_status(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<LabelCount>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).equipment_status().await?))
}

pub async fn species_per_habitat(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<HabitatSpeciesCount>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).species_per_habitat().await?))
}

pub async fn ranger_summary(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<RangerSummary>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnalyticsService::new(&gw).ranger_summary().await?))
}

pub async fn recent_sightings(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(window): Query<Window>,
) -> ApiResult<Vec<DailySightings>> {
    let gw = session_gateway(&state, &ctx).await?;
    let days = window.days.unwrap_or(state.config.api.recent_sighting_days);
    Ok(ApiResponse::success(AnalyticsService::new(&gw).recent_sightings(days).await?))
}
