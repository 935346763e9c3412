// handlers/protected/species.rs - /api/species and alternative names

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::access::SessionContext;
use crate::database::models::{AltName, Species, SpeciesAltName, SpeciesInput};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::SpeciesService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<Species>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SpeciesService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Species> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SpeciesService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<SpeciesInput>,
) -> ApiResult<Species> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(SpeciesService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<SpeciesInput>,
) -> ApiResult<Species> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SpeciesService::new(&gw, &ctx).update(id, &body).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    SpeciesService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}

pub async fn alt_names_all(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<SpeciesAltName>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SpeciesService::new(&gw, &ctx).all_alt_names().await?))
}

pub async fn alt_names(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<AltName>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(SpeciesService::new(&gw, &ctx).alt_names(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct AltNameBody {
    pub alt_name: String,
}

pub async fn alt_name_add(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<AltNameBody>,
) -> ApiResult<AltName> {
    let gw = mutating_gateway(&state, &ctx).await?;
    let name = SpeciesService::new(&gw, &ctx).add_alt_name(id, &body.alt_name).await?;
    Ok(ApiResponse::created(name))
}

pub async fn alt_name_remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((id, name)): Path<(i32, String)>,
) -> ApiResult<AltName> {
    let gw = mutating_gateway(&state, &ctx).await?;
    SpeciesService::new(&gw, &ctx).remove_alt_name(id, &name).await?;
    Ok(ApiResponse::success(AltName { sp_id: id, alt_name: name }))
}
