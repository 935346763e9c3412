// handlers/protected/habitats.rs - /api/habitats and species links

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::access::SessionContext;
use crate::database::models::{Habitat, HabitatInput, HabitatSpecies};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::HabitatService;

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<Habitat>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(HabitatService::new(&gw, &ctx).list().await?))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Habitat> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(HabitatService::new(&gw, &ctx).get(id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<HabitatInput>,
) -> ApiResult<Habitat> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(HabitatService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<HabitatInput>,
) -> ApiResult<Habitat> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(HabitatService::new(&gw, &ctx).update(id, &body).await?))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<i32> {
    let gw = mutating_gateway(&state, &ctx).await?;
    HabitatService::new(&gw, &ctx).delete(id).await?;
    Ok(ApiResponse::success(id))
}

pub async fn links_all(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> ApiResult<Vec<HabitatSpecies>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(HabitatService::new(&gw, &ctx).all_links().await?))
}

pub async fn species_list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
) -> ApiResult<Vec<HabitatSpecies>> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(HabitatService::new(&gw, &ctx).species(id).await?))
}

#[derive(Debug, Deserialize)]
pub struct LinkBody {
    pub sp_id: i32,
}

#[derive(Debug, Serialize)]
pub struct Link {
    pub habitat_id: i32,
    pub sp_id: i32,
}

pub async fn species_link(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(id): Path<i32>,
    Json(body): Json<LinkBody>,
) -> ApiResult<Link> {
    let gw = mutating_gateway(&state, &ctx).await?;
    HabitatService::new(&gw, &ctx).link_species(id, body.sp_id).await?;
    Ok(ApiResponse::created(Link {
        habitat_id: id,
        sp_id: body.sp_id,
    }))
}

pub async fn species_unlink(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((id, sp_id)): Path<(i32, i32)>,
) -> ApiResult<Link> {
    let gw = mutating_gateway(&state, &ctx).await?;
    HabitatService::new(&gw, &ctx).unlink_species(id, sp_id).await?;
    Ok(ApiResponse::success(Link { habitat_id: id, sp_id }))
}
