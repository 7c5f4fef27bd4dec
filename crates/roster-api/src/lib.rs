//! REST API for Roster.
//!
//! Exposes axum [`Router`]s backed by any [`roster_core::store::StudentStore`],
//! one rendering JSON and one rendering XML. CORS, tracing and transport
//! concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", roster_api::api_router(store.clone()))
//! .nest("/xml/api", roster_api::xml_router(store.clone()))
//! ```

pub mod batch;
pub mod error;
pub mod render;
pub mod statistics;
pub mod students;
pub mod xml;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use roster_core::store::StudentStore;

pub use error::ApiError;
pub use render::Format;

// ─── State ────────────────────────────────────────────────────────────────────

/// Shared state threaded through all handlers of one router.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub format: Format,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:  Arc::clone(&self.store),
      format: self.format,
    }
  }
}

// ─── Routers ──────────────────────────────────────────────────────────────────

/// Build the JSON API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  router(ApiState { store, format: Format::Json })
}

/// Build the XML variant of [`api_router`]; same routes, XML bodies.
pub fn xml_router<S>(store: Arc<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  router(ApiState { store, format: Format::Xml })
}

pub fn router<S>(state: ApiState<S>) -> Router<()>
where
  S: StudentStore + 'static,
{
  Router::new()
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .route("/students/batch", post(batch::create_many::<S>))
    .route("/students/code/{code}", get(students::get_by_code::<S>))
    .route(
      "/students/{id}",
      get(students::get_one::<S>)
        .put(students::update::<S>)
        .delete(students::delete_one::<S>),
    )
    // Aggregates
    .route("/statistics", get(statistics::handler::<S>))
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
