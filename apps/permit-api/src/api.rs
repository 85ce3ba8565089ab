//! Route handlers for the permit API
//!
//! - `GET /v1/permits` filtered, paginated listing
//! - `GET /v1/permits/:permit_id` single permit lookup

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use permit_core::{
    find_permit, is_valid_permit_id, paginate, FieldError, PaginatedResponse, Permit, PermitQuery,
    PERMITS_PATH,
};
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Fetch the full collection off the async runtime
async fn load_permits(state: &AppState) -> Result<Vec<Permit>, ApiError> {
    let source = Arc::clone(&state.source);
    tokio::task::spawn_blocking(move || source.load())
        .await
        .map_err(|e| ApiError::Internal(format!("permit load task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Handler: GET /v1/permits
pub async fn handle_list_permits(
    State(state): State<Arc<AppState>>,
    params: Result<Query<HashMap<String, String>>, QueryRejection>,
) -> Result<Json<PaginatedResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        ApiError::Validation(vec![FieldError::new("query", rejection.body_text())])
    })?;

    let query = PermitQuery::parse(&params).map_err(ApiError::Validation)?;
    debug!(?query, "List permits");

    let permits = load_permits(&state).await?;
    Ok(Json(paginate(&permits, &query, PERMITS_PATH)))
}

/// Handler: GET /v1/permits/:permit_id
pub async fn handle_get_permit(
    State(state): State<Arc<AppState>>,
    permit_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Permit>, ApiError> {
    let Path(permit_id) = permit_id.map_err(|e| ApiError::InvalidPermitId(e.body_text()))?;

    if !is_valid_permit_id(&permit_id) {
        return Err(ApiError::InvalidPermitId(permit_id));
    }

    let permits = load_permits(&state).await?;
    find_permit(&permits, &permit_id)
        .cloned()
        .map(Json)
        .ok_or(ApiError::PermitNotFound(permit_id))
}

/// Fallback for unknown routes and unsupported methods
pub async fn handle_not_found() -> ApiError {
    ApiError::RouteNotFound
}
