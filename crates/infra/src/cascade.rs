//! Application-enforced cascade deletion.
//!
//! The store has no foreign keys, so removing a provider must remove every
//! resource that references it first. The cascade runs strictly before the
//! parent record itself is deleted; if any child collection cannot be
//! cleared, the whole parent deletion aborts and both the parent and the
//! surviving children remain.

use serde_json::Value as JsonValue;

use campdex_catalog::{course, review, PARENT_REF_FIELD};
use campdex_core::{DomainResult, ResourceId};
use campdex_query::FilterPredicate;

use crate::document_store::DocumentStore;

/// Child collections removed when a provider is deleted.
pub const CHILD_COLLECTIONS: [&str; 2] = [course::COLLECTION, review::COLLECTION];

/// Deletes all children referencing a parent, for every child type.
#[derive(Debug)]
pub struct CascadeDeleter<S> {
    store: S,
}

impl<S> CascadeDeleter<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> CascadeDeleter<S>
where
    S: DocumentStore,
{
    /// Remove every child of `parent_id` from every child collection.
    ///
    /// A storage failure on any collection aborts the cascade, and with it
    /// the parent deletion, so survivors are never orphaned.
    pub fn on_parent_delete(&self, parent_id: ResourceId) -> DomainResult<()> {
        let filter = [FilterPredicate::eq(
            PARENT_REF_FIELD,
            JsonValue::String(parent_id.to_string()),
        )];

        for collection in CHILD_COLLECTIONS {
            let removed = self.store.delete_many(collection, &filter)?;
            tracing::debug!(parent = %parent_id, collection, removed, "cascade removed children");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::document_store::InMemoryDocumentStore;

    use super::*;

    #[test]
    fn removes_children_of_every_type_and_only_them() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = ResourceId::new();
        let other = ResourceId::new();

        store
            .insert_many(
                course::COLLECTION,
                vec![
                    json!({"id": "c1", (PARENT_REF_FIELD): parent.to_string()}),
                    json!({"id": "c2", (PARENT_REF_FIELD): other.to_string()}),
                ],
            )
            .unwrap();
        store
            .insert_many(
                review::COLLECTION,
                vec![json!({"id": "r1", (PARENT_REF_FIELD): parent.to_string()})],
            )
            .unwrap();

        CascadeDeleter::new(store.clone())
            .on_parent_delete(parent)
            .unwrap();

        let survivors = store
            .find_one(course::COLLECTION, &[FilterPredicate::eq("id", json!("c2"))])
            .unwrap();
        assert!(survivors.is_some());

        let gone = [
            FilterPredicate::eq(PARENT_REF_FIELD, json!(parent.to_string())),
        ];
        assert!(store.find_one(course::COLLECTION, &gone).unwrap().is_none());
        assert!(store.find_one(review::COLLECTION, &gone).unwrap().is_none());
    }
}
