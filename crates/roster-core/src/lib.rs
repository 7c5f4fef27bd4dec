//! Core types and trait definitions for the Roster student store.
//!
//! This crate has no HTTP or file I/O dependencies.
//! All other crates depend on it.

// Backends implement the store trait with native `async fn`.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod store;
pub mod student;
pub mod validate;

pub use error::{Error, Result};
