//! Handler for `POST /students/batch`.
//!
//! Each entry is validated and created on its own. Rejections are reported
//! per entry; the rest of the batch still goes through.

use axum::{
  Json,
  extract::State,
  response::Response,
};
use roster_core::{
  store::StudentStore,
  student::{NewStudent, Student},
};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// One rejected batch entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchError {
  /// Position of the entry in the request body.
  pub index: usize,
  pub code:  String,
  pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutcome {
  pub created: Vec<Student>,
  pub errors:  Vec<BatchError>,
  pub message: String,
}

/// `POST /students/batch`. Body: a JSON array of [`NewStudent`].
pub async fn create_many<S>(
  State(state): State<ApiState<S>>,
  Json(inputs): Json<Vec<NewStudent>>,
) -> Result<Response, ApiError>
where
  S: StudentStore + 'static,
{
  let total = inputs.len();
  let mut created = Vec::with_capacity(total);
  let mut errors = Vec::new();

  for (index, input) in inputs.into_iter().enumerate() {
    let code = input.code.clone();
    let result = match input.validate() {
      Ok(()) => state.store.create(input).await.map_err(ApiError::from_store),
      Err(e) => Err(e.into()),
    };
    match result {
      Ok(student) => created.push(student),
      Err(e) => {
        tracing::debug!(index, %code, error = %e, "batch entry rejected");
        errors.push(BatchError { index, code, error: reason(&e) });
      }
    }
  }

  let message = format!("created {} of {total} students", created.len());
  state.format.ok(&BatchOutcome { created, errors, message })
}

/// The client-facing part of an error, without the variant prefix.
fn reason(e: &ApiError) -> String {
  match e {
    ApiError::NotFound(m)
    | ApiError::BadRequest(m)
    | ApiError::Invalid(m)
    | ApiError::Render(m) => m.clone(),
    ApiError::Store(e) => e.to_string(),
  }
}
