//! `campdex-query` — query-string compilation (pure, no I/O).
//!
//! Turns an arbitrary, attacker-controlled set of request parameters into a
//! safe, structured [`QueryIntent`]: filter predicates, sort order, field
//! projection, and pagination. The compiler is **total** (malformed input is
//! absorbed into defensive defaults, never surfaced as an error) and it never
//! touches storage; the intent is handed to the store's native
//! filter/sort/project/skip/limit primitives.

pub mod compile;
pub mod intent;

pub use compile::compile;
pub use intent::{
    fields, FilterPredicate, Operator, Pagination, Projection, ProjectionMode, QueryIntent,
    SortDirection, SortKey,
};
