// handlers/protected/routines.rs - stored functions and procedures over HTTP

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::access::SessionContext;
use crate::database::models::{HealthStatus, ThreatReportInput};
use crate::error::ApiError;
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{RoutineService, ThreatService};

#[derive(Debug, Serialize)]
pub struct AnimalAge {
    pub sp_id: i32,
    pub animal_id: i32,
    pub age_years: i32,
}

#[derive(Debug, Serialize)]
pub struct RangerExperience {
    pub ranger_id: i32,
    pub experience_years: i32,
}

#[derive(Debug, Serialize)]
pub struct ThreatSeverity {
    pub report_id: i32,
    pub score: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthUpdate {
    pub tracking_id: String,
    pub health_status: HealthStatus,
}

pub async fn age_of_animal(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((sp_id, animal_id)): Path<(i32, i32)>,
) -> ApiResult<AnimalAge> {
    let gw = session_gateway(&state, &ctx).await?;
    let age_years = RoutineService::new(&gw, &ctx)
        .age_of_animal(animal_id, sp_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("animal {} of species {} not found", animal_id, sp_id)))?;

    Ok(ApiResponse::success(AnimalAge { sp_id, animal_id, age_years }))
}

pub async fn ranger_experience(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(ranger_id): Path<i32>,
) -> ApiResult<RangerExperience> {
    let gw = session_gateway(&state, &ctx).await?;
    let experience_years = RoutineService::new(&gw, &ctx)
        .ranger_experience(ranger_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("ranger {} not found", ranger_id)))?;

    Ok(ApiResponse::success(RangerExperience { ranger_id, experience_years }))
}

/// Always 200; an unknown report scores 0.
pub async fn threat_severity(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(report_id): Path<i32>,
) -> ApiResult<ThreatSeverity> {
    let gw = session_gateway(&state, &ctx).await?;
    let score = RoutineService::new(&gw, &ctx).threat_severity_score(report_id).await?;
    Ok(ApiResponse::success(ThreatSeverity { report_id, score }))
}

pub async fn update_animal_health(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<HealthUpdate>,
) -> ApiResult<HealthUpdate> {
    let gw = mutating_gateway(&state, &ctx).await?;
    RoutineService::new(&gw, &ctx)
        .update_animal_health(&body.tracking_id, body.health_status)
        .await?;
    Ok(ApiResponse::success(body))
}

pub async fn log_threat_report(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<ThreatReportInput>,
) -> ApiResult<ThreatReportInput> {
    let gw = mutating_gateway(&state, &ctx).await?;
    ThreatService::new(&gw, &ctx).log(&body).await?;
    Ok(ApiResponse::created(body))
}
