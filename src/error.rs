//! Error taxonomy shared across the crate.
//!
//! Absent collections and records are not errors: read and mutation
//! operations surface them as `None` so the host can answer 404 without
//! unwinding. Errors are reserved for I/O, serialization, and a store
//! whose shape cannot be served at all.

use std::io;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by the store engine.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure while persisting or loading the store.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The store could not be serialized for persistence.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A top-level value is neither an array of records nor an object.
    /// Detected at open time; the store refuses to serve.
    #[error("invalid store shape in collection '{collection}': {reason}")]
    InvalidStore {
        /// Name of the offending top-level key.
        collection: String,
        /// Human-readable description of the shape violation.
        reason: &'static str,
    },
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}
