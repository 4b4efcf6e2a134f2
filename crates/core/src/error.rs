//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic failures of the directory's own rules
/// (validation, missing resources) plus the two infrastructure outcomes the
/// maintenance layer must distinguish (aggregation vs. raw storage failures).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found.
    ///
    /// During a recompute this aborts only that recompute; the child mutation
    /// that triggered it stays committed.
    #[error("not found")]
    NotFound,

    /// A group-aggregate step failed or produced an unusable result.
    ///
    /// Callers must treat this as the empty-set zero case rather than storing
    /// a NaN/null aggregate.
    #[error("aggregation failed: {0}")]
    Aggregation(String),

    /// The underlying document store was unavailable or misbehaved.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn aggregation(msg: impl Into<String>) -> Self {
        Self::Aggregation(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
