//! The `StudentStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-file`).
//! Higher layers (`roster-api`, `roster-server`) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::student::{NewStudent, Statistics, Student, StudentId, StudentPatch};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 100;

// ─── Errors ──────────────────────────────────────────────────────────────────

/// Implemented by backend error types so the HTTP layer can classify a
/// failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The domain error wrapped by this backend error, if any.
  fn as_core(&self) -> Option<&crate::Error>;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster student store backend.
///
/// Mutations are serialised against each other and against reads; every
/// successful mutation is durable before it returns. Lookups that miss are
/// reported as `None` / `false`, never as errors.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait StudentStore: Send + Sync {
  type Error: StoreError;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// Records in creation order, skipping `skip` and returning at most
  /// `limit`.
  fn list(
    &self,
    skip: usize,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Retrieve a record by its caller-assigned code.
  fn get_by_code<'a>(
    &'a self,
    code: &'a str,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + 'a;

  /// Case-insensitive substring search over code, names, email and
  /// hometown. An empty or missing keyword behaves like
  /// `list(0, DEFAULT_LIMIT)`.
  fn search<'a>(
    &'a self,
    keyword: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + 'a;

  fn statistics(
    &self,
  ) -> impl Future<Output = Result<Statistics, Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Persist a new record under a fresh id.
  ///
  /// Fails with [`crate::Error::DuplicateCode`] if the code is taken.
  fn create(
    &self,
    input: NewStudent,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  /// Apply a partial update. Returns `None` if `id` does not exist.
  ///
  /// Fails with [`crate::Error::DuplicateCode`] if the patch moves the record
  /// onto a code held by another record.
  fn update(
    &self,
    id: StudentId,
    patch: StudentPatch,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// Hard-delete a record. Returns `false` if it did not exist.
  fn delete(
    &self,
    id: StudentId,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
