//! Alacena is an embeddable JSON document store organized as named
//! collections of records, queried and mutated through flat key/value
//! parameters in the style of conventions-based REST servers.
//!
//! The crate owns the resource engine only: condition parsing and
//! evaluation, sorting, pagination, relation embedding by foreign-key
//! naming convention, record identity, and cascading cleanup on delete.
//! Transport concerns (HTTP routing, middleware, CLI) live in the host
//! process, which hands this crate parsed parameters and receives plain
//! records or page envelopes back.

#![warn(missing_docs)]

pub mod db;
pub mod error;
pub mod query;
pub mod relate;

pub use db::{Config, Database, JsonFileSink, MemorySink, Record, Sink, Store};
pub use error::{Result, StoreError};
pub use query::{ListQuery, ListResult, Page};
