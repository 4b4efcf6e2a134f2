//! Derived-aggregate maintenance.
//!
//! Maintainers keep denormalized summary fields on a provider correct as its
//! children change. The model is **recompute-from-scratch**: every trigger
//! re-reads the full current child set through the store's group-aggregate
//! primitive and overwrites the parent's derived fields. Nothing is cached
//! and nothing is updated incrementally; the cost is O(children) per child
//! mutation and the payoff is immunity to incremental-drift bugs.
//!
//! Consistency is eventual. A recompute races freely with concurrent child
//! writes; after the last mutation quiesces, the recompute that observes the
//! final child set converges the aggregate.

use serde_json::{json, Value as JsonValue};

use campdex_catalog::{course, provider, review, PARENT_REF_FIELD};
use campdex_core::{DomainError, DomainResult, ResourceId};
use campdex_events::{LifecycleEvent, LifecycleKind, LifecycleListener};
use campdex_query::FilterPredicate;

use crate::document_store::{DocumentStore, GroupRow};

/// Recomputes one family of derived fields for one parent.
pub trait AggregateMaintainer: Send + Sync {
    /// Stable name used in logging.
    fn name(&self) -> &'static str;

    /// Child collection whose mutations this maintainer reacts to.
    fn child_collection(&self) -> &'static str;

    /// Re-derive the parent's aggregate fields from its full current child
    /// set. An empty child set resets the aggregates to their zero values.
    ///
    /// Returns `NotFound` when the parent no longer exists; that aborts only
    /// this recompute, never the child mutation that triggered it.
    fn recompute(&self, parent_id: ResourceId) -> DomainResult<()>;
}

fn id_filter(id: ResourceId) -> [FilterPredicate; 1] {
    [FilterPredicate::eq("id", JsonValue::String(id.to_string()))]
}

fn children_of(parent_id: ResourceId) -> [FilterPredicate; 1] {
    [FilterPredicate::eq(
        PARENT_REF_FIELD,
        JsonValue::String(parent_id.to_string()),
    )]
}

/// Mean, guarded against the no-rows and non-finite cases, which both
/// collapse to the empty-set zero value rather than a stored NaN.
fn guarded_average(rows: &[GroupRow]) -> f64 {
    let average = rows.first().map(|row| row.avg).unwrap_or(0.0);
    if average.is_finite() && average >= 0.0 {
        average
    } else {
        tracing::warn!(average, "group aggregate produced unusable mean; storing zero");
        0.0
    }
}

/// Maintains `Provider.average_tuition` from the provider's courses.
///
/// The stored value is the mean course tuition rounded **up** to the nearest
/// multiple of 10.
#[derive(Debug)]
pub struct TuitionAverageMaintainer<S> {
    store: S,
}

impl<S> TuitionAverageMaintainer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> AggregateMaintainer for TuitionAverageMaintainer<S>
where
    S: DocumentStore,
{
    fn name(&self) -> &'static str {
        "tuition_average"
    }

    fn child_collection(&self) -> &'static str {
        course::COLLECTION
    }

    fn recompute(&self, parent_id: ResourceId) -> DomainResult<()> {
        let rows = self.store.aggregate_group(
            course::COLLECTION,
            &children_of(parent_id),
            PARENT_REF_FIELD,
            course::TUITION_FIELD,
        )?;

        let average = guarded_average(&rows);
        let rounded = ((average / 10.0).ceil() as u64) * 10;

        let updated = self.store.update_one(
            provider::COLLECTION,
            &id_filter(parent_id),
            &json!({ (provider::derived::AVERAGE_TUITION): rounded }),
        )?;
        if updated.is_none() {
            return Err(DomainError::not_found());
        }

        tracing::debug!(parent = %parent_id, average_tuition = rounded, "recomputed tuition aggregate");
        Ok(())
    }
}

/// Maintains `Provider.average_rating` and `Provider.review_count` from the
/// provider's reviews.
#[derive(Debug)]
pub struct RatingStatsMaintainer<S> {
    store: S,
}

impl<S> RatingStatsMaintainer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

impl<S> AggregateMaintainer for RatingStatsMaintainer<S>
where
    S: DocumentStore,
{
    fn name(&self) -> &'static str {
        "rating_stats"
    }

    fn child_collection(&self) -> &'static str {
        review::COLLECTION
    }

    fn recompute(&self, parent_id: ResourceId) -> DomainResult<()> {
        let rows = self.store.aggregate_group(
            review::COLLECTION,
            &children_of(parent_id),
            PARENT_REF_FIELD,
            review::RATING_FIELD,
        )?;

        let average = guarded_average(&rows);
        let count = rows.first().map(|row| row.count).unwrap_or(0);

        let updated = self.store.update_one(
            provider::COLLECTION,
            &id_filter(parent_id),
            &json!({
                (provider::derived::AVERAGE_RATING): average,
                (provider::derived::REVIEW_COUNT): count,
            }),
        )?;
        if updated.is_none() {
            return Err(DomainError::not_found());
        }

        tracing::debug!(parent = %parent_id, average_rating = average, review_count = count, "recomputed rating aggregate");
        Ok(())
    }
}

/// Lifecycle adapter: maps the mutation trigger table onto recompute calls.
///
/// - created → recompute the new parent
/// - updated → both parents when the reference changed, else the current one
/// - deleted → recompute the pre-image parent
///
/// `Before*` events carry no committed state change and are ignored.
pub struct RecomputeOnLifecycle<M> {
    maintainer: M,
}

impl<M> RecomputeOnLifecycle<M> {
    pub fn new(maintainer: M) -> Self {
        Self { maintainer }
    }
}

impl<M> LifecycleListener for RecomputeOnLifecycle<M>
where
    M: AggregateMaintainer,
{
    fn name(&self) -> &'static str {
        self.maintainer.name()
    }

    fn on_event(&self, event: &LifecycleEvent) -> DomainResult<()> {
        if event.collection() != self.maintainer.child_collection() {
            return Ok(());
        }

        let recompute = |parent: Option<ResourceId>| match parent {
            Some(parent) => self.maintainer.recompute(parent),
            None => Ok(()),
        };

        match *event.kind() {
            LifecycleKind::AfterCreate { parent_after, .. } => recompute(parent_after),
            LifecycleKind::AfterUpdate {
                parent_before,
                parent_after,
                ..
            } => {
                if parent_before == parent_after {
                    recompute(parent_after)
                } else {
                    // Reparented: both sides need fresh aggregates. Run both
                    // even if the first fails, then surface the first error.
                    let old = recompute(parent_before);
                    let new = recompute(parent_after);
                    old.and(new)
                }
            }
            LifecycleKind::AfterDelete { parent_before, .. } => recompute(parent_before),
            LifecycleKind::BeforeUpdate { .. } | LifecycleKind::BeforeDelete { .. } => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use campdex_catalog::{Provider, ProviderDraft};

    use crate::document_store::InMemoryDocumentStore;

    use super::*;

    fn seeded_provider(store: &InMemoryDocumentStore) -> ResourceId {
        let provider = Provider::from_draft(ProviderDraft {
            name: "Test Camp".to_string(),
            description: String::new(),
            website: None,
            email: None,
            phone: None,
            careers: vec![],
            housing: false,
            job_assistance: false,
        })
        .unwrap();
        let id = provider.id.0;
        store
            .insert_many(
                provider::COLLECTION,
                vec![serde_json::to_value(&provider).unwrap()],
            )
            .unwrap();
        id
    }

    fn add_course(store: &InMemoryDocumentStore, parent: ResourceId, tuition: u64) {
        store
            .insert_many(
                course::COLLECTION,
                vec![json!({
                    "id": ResourceId::new().to_string(),
                    (PARENT_REF_FIELD): parent.to_string(),
                    "tuition": tuition,
                })],
            )
            .unwrap();
    }

    fn stored_provider(store: &InMemoryDocumentStore, id: ResourceId) -> JsonValue {
        store
            .find_one(provider::COLLECTION, &id_filter(id))
            .unwrap()
            .unwrap()
    }

    // Three children at 100/200/300 average to 200, already a multiple of 10.
    #[test]
    fn mean_of_children_is_stored_on_the_parent() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = seeded_provider(&store);
        for tuition in [100, 200, 300] {
            add_course(&store, parent, tuition);
        }

        TuitionAverageMaintainer::new(store.clone())
            .recompute(parent)
            .unwrap();

        assert_eq!(
            stored_provider(&store, parent)[provider::derived::AVERAGE_TUITION],
            json!(200)
        );
    }

    #[test]
    fn mean_rounds_up_to_the_nearest_ten() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = seeded_provider(&store);
        for tuition in [100, 101] {
            add_course(&store, parent, tuition);
        }

        TuitionAverageMaintainer::new(store.clone())
            .recompute(parent)
            .unwrap();

        // mean 100.5 → 110
        assert_eq!(
            stored_provider(&store, parent)[provider::derived::AVERAGE_TUITION],
            json!(110)
        );
    }

    #[test]
    fn empty_child_set_resets_to_zero() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = seeded_provider(&store);
        add_course(&store, parent, 500);

        let maintainer = TuitionAverageMaintainer::new(store.clone());
        maintainer.recompute(parent).unwrap();
        store
            .delete_many(course::COLLECTION, &children_of(parent))
            .unwrap();
        maintainer.recompute(parent).unwrap();

        assert_eq!(
            stored_provider(&store, parent)[provider::derived::AVERAGE_TUITION],
            json!(0)
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = seeded_provider(&store);
        add_course(&store, parent, 730);

        let maintainer = TuitionAverageMaintainer::new(store.clone());
        maintainer.recompute(parent).unwrap();
        let first = stored_provider(&store, parent)[provider::derived::AVERAGE_TUITION].clone();
        maintainer.recompute(parent).unwrap();
        let second = stored_provider(&store, parent)[provider::derived::AVERAGE_TUITION].clone();

        assert_eq!(first, second);
        assert_eq!(first, json!(730));
    }

    #[test]
    fn missing_parent_is_not_found() {
        let store = Arc::new(InMemoryDocumentStore::new());

        let err = TuitionAverageMaintainer::new(store)
            .recompute(ResourceId::new())
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound));
    }

    #[test]
    fn rating_stats_store_mean_and_count() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let parent = seeded_provider(&store);
        for rating in [4, 7] {
            store
                .insert_many(
                    review::COLLECTION,
                    vec![json!({
                        "id": ResourceId::new().to_string(),
                        (PARENT_REF_FIELD): parent.to_string(),
                        "rating": rating,
                    })],
                )
                .unwrap();
        }

        RatingStatsMaintainer::new(store.clone())
            .recompute(parent)
            .unwrap();

        let stored = stored_provider(&store, parent);
        assert_eq!(stored[provider::derived::AVERAGE_RATING], json!(5.5));
        assert_eq!(stored[provider::derived::REVIEW_COUNT], json!(2));
    }

    #[test]
    fn events_for_other_collections_are_ignored() {
        let store = Arc::new(InMemoryDocumentStore::new());
        let listener = RecomputeOnLifecycle::new(TuitionAverageMaintainer::new(store));

        // A review event must not trigger the tuition maintainer; a parent id
        // that does not exist would otherwise surface NotFound.
        let event = LifecycleEvent::after_create(
            review::COLLECTION,
            ResourceId::new(),
            Some(ResourceId::new()),
        );
        assert!(listener.on_event(&event).is_ok());
    }
}
