//! Handler for `GET /statistics`.

use axum::{extract::State, response::Response};
use roster_core::store::StudentStore;

use crate::{ApiState, error::ApiError};

/// `GET /statistics`: record count and per-field means.
pub async fn handler<S>(State(state): State<ApiState<S>>) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  let stats = state.store.statistics().await.map_err(ApiError::from_store)?;
  state.format.ok(&stats)
}
