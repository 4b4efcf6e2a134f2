//! Structured query representation handed to the storage layer.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Well-known document field names shared between the compiler and the store.
pub mod fields {
    /// Creation timestamp; the default sort key.
    pub const CREATED_AT: &str = "created_at";

    /// Internal revision counter stamped by the store on every write.
    ///
    /// Excluded by the default projection so it never leaks to clients unless
    /// explicitly requested.
    pub const REVISION: &str = "_rev";
}

/// Comparison operator of a filter predicate.
///
/// The set is closed: anything outside it is rejected at compile time and the
/// offending parameter is dropped.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
    In,
    #[serde(rename = "nin")]
    NotIn,
}

impl Operator {
    /// Parse a bracketed operator token (`gte` in `tuition[gte]`).
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "ne" => Some(Self::Ne),
            "in" => Some(Self::In),
            "nin" => Some(Self::NotIn),
            _ => None,
        }
    }

    /// Whether this operator compares against a list of scalars.
    pub fn takes_many(self) -> bool {
        matches!(self, Self::In | Self::NotIn)
    }
}

/// A single filter predicate: `(field, operator, value)`.
///
/// `In`/`NotIn` carry a JSON array of scalars; every other operator carries a
/// single scalar (number or string).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub field: String,
    pub op: Operator,
    pub value: JsonValue,
}

impl FilterPredicate {
    pub fn new(field: impl Into<String>, op: Operator, value: JsonValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Structural-equality predicate, the most common case.
    pub fn eq(field: impl Into<String>, value: JsonValue) -> Self {
        Self::new(field, Operator::Eq, value)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// One sort key; earlier keys take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Default ordering when the request names none: newest first.
    pub fn default_sort() -> Vec<Self> {
        vec![Self::desc(fields::CREATED_AT)]
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectionMode {
    Include,
    Exclude,
}

/// Field projection: either an inclusion allow-list or an exclusion list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub mode: ProjectionMode,
    pub fields: Vec<String>,
}

impl Projection {
    pub fn include(fields: Vec<String>) -> Self {
        Self {
            mode: ProjectionMode::Include,
            fields,
        }
    }

    pub fn exclude(fields: Vec<String>) -> Self {
        Self {
            mode: ProjectionMode::Exclude,
            fields,
        }
    }
}

impl Default for Projection {
    /// Suppress only the store's internal revision field; no other implicit
    /// field suppression.
    fn default() -> Self {
        Self::exclude(vec![fields::REVISION.to_string()])
    }
}

/// Result-window parameters. Invariant: `limit >= 1`, `skip >= 0`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub skip: u64,
    pub limit: u64,
}

impl Pagination {
    pub const DEFAULT_LIMIT: u64 = 10;

    /// Build from a 1-based page number.
    pub fn from_page(page: u64, limit: u64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        Self {
            skip: (page - 1).saturating_mul(limit),
            limit,
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// The compiled, validated representation of a client's read request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryIntent {
    pub filter: Vec<FilterPredicate>,
    pub sort: Vec<SortKey>,
    pub projection: Projection,
    pub pagination: Pagination,
}

impl Default for QueryIntent {
    fn default() -> Self {
        Self {
            filter: Vec::new(),
            sort: SortKey::default_sort(),
            projection: Projection::default(),
            pagination: Pagination::default(),
        }
    }
}

impl QueryIntent {
    /// Intent matching a single equality predicate, defaults elsewhere.
    pub fn filtered_by(field: impl Into<String>, value: JsonValue) -> Self {
        Self {
            filter: vec![FilterPredicate::eq(field, value)],
            ..Self::default()
        }
    }

    /// Add a predicate to an existing intent (repository-side scoping, e.g.
    /// constraining a listing to one parent).
    pub fn and_filter(mut self, predicate: FilterPredicate) -> Self {
        self.filter.push(predicate);
        self
    }
}
