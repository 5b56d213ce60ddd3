#![forbid(unsafe_code)]

//! The store itself: data shape, identity, mutation, and persistence.

mod config;
mod database;
mod identity;
mod mutate;
mod sink;
mod store;


pub use config::Config;
pub use database::Database;
pub use identity::fresh_id;
pub use sink::{JsonFileSink, MemorySink, Sink};
pub use store::{Record, Store};
