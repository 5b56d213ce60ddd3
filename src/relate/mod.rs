#![forbid(unsafe_code)]

//! Relation resolution by naming convention.
//!
//! A record in `comments` points at a record in `posts` through a field
//! named `postId`: the singularized related collection name plus a
//! configurable suffix. Inverting the convention turns the same field
//! into a one-to-many relation from `posts` back to `comments`. The
//! pluralization rules live behind a small strategy trait because they
//! are the most locale-bound part of the design.

/// Relation embedding for single records and list results.
pub mod embed;

/// English pluralization strategy.
pub mod inflect;

pub use embed::embed_related;
pub use inflect::{EnglishInflector, Inflector};
