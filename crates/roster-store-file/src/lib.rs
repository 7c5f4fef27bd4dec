//! Flat-file backend for the Roster student store.
//!
//! The whole table lives in memory behind a single lock and is rewritten to
//! a JSON Lines file after every mutation.

mod encode;
mod store;
mod table;

pub mod error;

pub use error::{Error, Result};
pub use store::FileStore;
