// handlers/protected/animals.rs - /api/animals, keyed by (sp_id, animal_id)

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use crate::access::SessionContext;
use crate::database::models::{Animal, AnimalListing, AnimalUpdate, NewAnimal};
use crate::handlers::protected::{mutating_gateway, session_gateway};
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::AnimalService;

#[derive(Debug, Deserialize)]
pub struct AnimalFilter {
    pub sp_id: Option<i32>,
}

pub async fn list(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Query(filter): Query<AnimalFilter>,
) -> ApiResult<Vec<AnimalListing>> {
    let gw = session_gateway(&state, &ctx).await?;
    let service = AnimalService::new(&gw, &ctx);
    let animals = match filter.sp_id {
        Some(sp_id) => service.list_for_species(sp_id).await?,
        None => service.list().await?,
    };
    Ok(ApiResponse::success(animals))
}

pub async fn show(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((sp_id, animal_id)): Path<(i32, i32)>,
) -> ApiResult<Animal> {
    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(AnimalService::new(&gw, &ctx).get(animal_id, sp_id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Json(body): Json<NewAnimal>,
) -> ApiResult<Animal> {
    let gw = mutating_gateway(&state, &ctx).await?;
    Ok(ApiResponse::created(AnimalService::new(&gw, &ctx).create(&body).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((sp_id, animal_id)): Path<(i32, i32)>,
    Json(body): Json<AnimalUpdate>,
) -> ApiResult<Animal> {
    let gw = mutating_gateway(&state, &ctx).await?;
    let animal = AnimalService::new(&gw, &ctx).update(animal_id, sp_id, &body).await?;
    Ok(ApiResponse::success(animal))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path((sp_id, animal_id)): Path<(i32, i32)>,
) -> ApiResult<(i32, i32)> {
    let gw = mutating_gateway(&state, &ctx).await?;
    AnimalService::new(&gw, &ctx).delete(animal_id, sp_id).await?;
    Ok(ApiResponse::success((sp_id, animal_id)))
}
