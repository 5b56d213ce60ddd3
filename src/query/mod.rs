#![forbid(unsafe_code)]

//! Query engine: condition parsing and evaluation, sorting, pagination,
//! and the collection view pipeline.
//!
//! A request's flat query parameters are parsed once into a
//! [`ConditionTree`]; the tree is then evaluated against each record of a
//! collection. Sorting, slicing, and pagination operate on the filtered
//! list. The shared [`Operator`] vocabulary keeps the parser and the
//! evaluator from ever disagreeing about which comparisons exist.

/// Condition tree representation and record matching.
pub mod condition;

/// Comparison operator vocabulary.
pub mod op;

/// Page window computation and the page envelope.
pub mod paginate;

/// Translation of raw query parameters into a condition tree.
pub mod parse;

/// Sort key parsing and stable multi-key ordering.
pub mod sort;

/// The list / get-by-id view pipeline.
pub mod view;

pub use condition::{Condition, ConditionTree};
pub use op::Operator;
pub use paginate::{paginate, Page};
pub use parse::parse_conditions;
pub use sort::SortKey;
pub use view::{ListQuery, ListResult};
