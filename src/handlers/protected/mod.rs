// Protected handlers: bearer token required, /api/* prefix.
//
// Every handler gets the caller's SessionContext from the auth middleware and
// runs its statements on that session's own pool.

pub mod analytics;
pub mod animals;
pub mod auth;
pub mod equipment;
pub mod habitats;
pub mod organizations;
pub mod rangers;
pub mod routines;
pub mod session;
pub mod sightings;
pub mod species;
pub mod tables;
pub mod threats;

use crate::access::SessionContext;
use crate::database::PgGateway;
use crate::error::ApiError;
use crate::handlers::AppState;
use crate::services::ensure_can_mutate;

/// Gateway over the caller's session pool.
pub(crate) async fn session_gateway(state: &AppState, ctx: &SessionContext) -> Result<PgGateway, ApiError> {
    Ok(state.manager.gateway(ctx).await?)
}

/// Like [`session_gateway`], but refuses read-only roles before touching the pool.
pub(crate) async fn mutating_gateway(state: &AppState, ctx: &SessionContext) -> Result<PgGateway, ApiError> {
    ensure_can_mutate(ctx)?;
    session_gateway(state, ctx).await
}
