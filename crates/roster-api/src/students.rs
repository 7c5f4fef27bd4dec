//! Handlers for `/students` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/students` | `?skip`, `?limit` (1–1000), `?search` |
//! | `POST`   | `/students` | Body: [`NewStudent`]; returns 201 + stored record |
//! | `GET`    | `/students/{id}` | 404 if not found |
//! | `GET`    | `/students/code/{code}` | 404 if not found |
//! | `PUT`    | `/students/{id}` | Body: [`StudentPatch`]; only present fields change |
//! | `DELETE` | `/students/{id}` | 404 if not found |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::Response,
};
use roster_core::{
  store::{DEFAULT_LIMIT, StudentStore},
  student::{NewStudent, StudentId, StudentPatch},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

pub const MAX_LIMIT: usize = 1000;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  #[serde(default)]
  pub skip:   usize,
  #[serde(default = "default_limit")]
  pub limit:  usize,
  /// Keyword matched against code, names, email and hometown. When set,
  /// paging is ignored and every match is returned.
  pub search: Option<String>,
}

fn default_limit() -> usize { DEFAULT_LIMIT }

/// `GET /students[?skip=..][&limit=..][&search=..]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  if !(1..=MAX_LIMIT).contains(&params.limit) {
    return Err(ApiError::Invalid(format!(
      "limit must be between 1 and {MAX_LIMIT}, got {}",
      params.limit
    )));
  }

  let students = match params.search.as_deref().filter(|k| !k.is_empty()) {
    Some(keyword) => state.store.search(Some(keyword)).await,
    None => state.store.list(params.skip, params.limit).await,
  }
  .map_err(ApiError::from_store)?;

  state.format.ok(&students)
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /students/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<StudentId>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  let student = state
    .store
    .get(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  state.format.ok(&student)
}

/// `GET /students/code/{code}`
pub async fn get_by_code<S>(
  State(state): State<ApiState<S>>,
  Path(code): Path<String>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  let student = state
    .store
    .get_by_code(&code)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("student with code {code} not found")))?;
  state.format.ok(&student)
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /students`. Returns 201 + the stored record.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewStudent>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  body.validate()?;
  let student = state.store.create(body).await.map_err(ApiError::from_store)?;
  state.format.render(StatusCode::CREATED, &student)
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /students/{id}`. The body is a [`StudentPatch`]; `null` clears an
/// optional field, a missing key leaves it alone.
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<StudentId>,
  Json(patch): Json<StudentPatch>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  patch.validate()?;
  let student = state
    .store
    .update(id, patch)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("student {id} not found")))?;
  state.format.ok(&student)
}

// ─── Delete ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct Deleted {
  pub message:    String,
  pub student_id: StudentId,
}

/// `DELETE /students/{id}`
pub async fn delete_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<StudentId>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  let removed = state.store.delete(id).await.map_err(ApiError::from_store)?;
  if !removed {
    return Err(ApiError::NotFound(format!("student {id} not found")));
  }
  state.format.ok(&Deleted {
    message:    "student deleted".to_owned(),
    student_id: id,
  })
}
