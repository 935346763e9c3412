// handlers/protected/tables.rs - raw table browser

use axum::{
    extract::{Path, Query, State},
    Extension,
};
use serde::Deserialize;

use crate::access::SessionContext;
use crate::database::Row;
use crate::handlers::protected::session_gateway;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{Table, TableBrowser};

const DEFAULT_ROW_LIMIT: i64 = 100;
const MAX_ROW_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct RowsQuery {
    pub limit: Option<i64>,
}

pub async fn list() -> ApiResult<Vec<&'static str>> {
    Ok(ApiResponse::success(Table::ALL.iter().map(Table::as_str).collect()))
}

pub async fn rows(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
    Path(table): Path<String>,
    Query(query): Query<RowsQuery>,
) -> ApiResult<Vec<Row>> {
    let table: Table = table.parse()?;
    let limit = query.limit.unwrap_or(DEFAULT_ROW_LIMIT).clamp(0, MAX_ROW_LIMIT);

    let gw = session_gateway(&state, &ctx).await?;
    Ok(ApiResponse::success(TableBrowser::new(&gw).rows(table, limit).await?))
}
