//! Schemaless document storage abstraction.
//!
//! The trait exposes exactly the primitives the query compiler and the
//! consistency maintainers depend on (find/filter/sort/skip/limit/project
//! plus a group-aggregate step) and nothing else. Repositories and
//! maintainers depend on this trait, never on a concrete store.

pub mod in_memory;

use serde_json::Value as JsonValue;
use thiserror::Error;

use campdex_core::DomainError;
use campdex_query::{FilterPredicate, QueryIntent};

pub use in_memory::InMemoryDocumentStore;

/// Document store operation error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or its state is unusable.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A document or change set was not an object.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

impl From<StoreError> for DomainError {
    fn from(value: StoreError) -> Self {
        DomainError::storage(value.to_string())
    }
}

/// One row of a group-aggregate result.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupRow {
    /// The grouping key value.
    pub key: JsonValue,
    /// Arithmetic mean of the numeric values; 0 when the group holds none.
    pub avg: f64,
    pub sum: f64,
    /// Number of documents in the group (numeric or not).
    pub count: u64,
}

/// Store of schemaless JSON documents grouped in named collections.
///
/// Mutating primitives are find-and-mutate shaped: they locate at most one
/// document by filter and return its post-image (update) or pre-image
/// (delete), mirroring the store drivers this layer abstracts over.
pub trait DocumentStore: Send + Sync {
    /// Filter, sort, window, and project a collection.
    fn find(&self, collection: &str, intent: &QueryIntent) -> Result<Vec<JsonValue>, StoreError>;

    /// First document matching the filter, in natural (insertion) order.
    fn find_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError>;

    /// Append documents; returns them as stored (revision stamped).
    fn insert_many(
        &self,
        collection: &str,
        documents: Vec<JsonValue>,
    ) -> Result<Vec<JsonValue>, StoreError>;

    /// Merge-patch the first matching document's top-level fields.
    ///
    /// Returns the post-image, or `None` when nothing matched.
    fn update_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        changes: &JsonValue,
    ) -> Result<Option<JsonValue>, StoreError>;

    /// Remove the first matching document; returns its pre-image.
    fn delete_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError>;

    /// Remove every matching document; returns how many were removed.
    fn delete_many(&self, collection: &str, filter: &[FilterPredicate])
        -> Result<u64, StoreError>;

    /// Group matching documents by `group_key` and aggregate the numeric
    /// `value_field` per group (avg/sum/count).
    fn aggregate_group(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        group_key: &str,
        value_field: &str,
    ) -> Result<Vec<GroupRow>, StoreError>;
}

impl<S> DocumentStore for std::sync::Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn find(&self, collection: &str, intent: &QueryIntent) -> Result<Vec<JsonValue>, StoreError> {
        (**self).find(collection, intent)
    }

    fn find_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError> {
        (**self).find_one(collection, filter)
    }

    fn insert_many(
        &self,
        collection: &str,
        documents: Vec<JsonValue>,
    ) -> Result<Vec<JsonValue>, StoreError> {
        (**self).insert_many(collection, documents)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        changes: &JsonValue,
    ) -> Result<Option<JsonValue>, StoreError> {
        (**self).update_one(collection, filter, changes)
    }

    fn delete_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError> {
        (**self).delete_one(collection, filter)
    }

    fn delete_many(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<u64, StoreError> {
        (**self).delete_many(collection, filter)
    }

    fn aggregate_group(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        group_key: &str,
        value_field: &str,
    ) -> Result<Vec<GroupRow>, StoreError> {
        (**self).aggregate_group(collection, filter, group_key, value_field)
    }
}
