use std::sync::Arc;

use serde_json::Value as JsonValue;

use campdex_catalog::{provider, review, ProviderId, Review, ReviewDraft, ReviewId, PARENT_REF_FIELD};
use campdex_core::{DomainError, DomainResult};
use campdex_events::{LifecycleEvent, LifecycleHub};
use campdex_query::{FilterPredicate, QueryIntent};

use crate::document_store::DocumentStore;

use super::{decode, encode, id_filter, parent_ref, sanitize_patch};

/// Review mutations and reads, wrapped in lifecycle hooks.
///
/// Mirrors [`super::CourseRepository`]; the two stay separate because their
/// patch validation differs and reviews carry authorship.
pub struct ReviewRepository<S> {
    store: S,
    hub: Arc<LifecycleHub>,
}

impl<S> ReviewRepository<S> {
    pub fn new(store: S, hub: Arc<LifecycleHub>) -> Self {
        Self { store, hub }
    }
}

impl<S> ReviewRepository<S>
where
    S: DocumentStore,
{
    pub fn create(&self, provider_id: ProviderId, draft: ReviewDraft) -> DomainResult<Review> {
        if self
            .store
            .find_one(provider::COLLECTION, &id_filter(provider_id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        let new_review = Review::from_draft(provider_id, draft)?;
        self.store
            .insert_many(review::COLLECTION, vec![encode(&new_review)?])?;

        self.hub.emit(&LifecycleEvent::after_create(
            review::COLLECTION,
            new_review.id.0,
            Some(provider_id.0),
        ));

        Ok(new_review)
    }

    pub fn list(&self, intent: &QueryIntent) -> DomainResult<Vec<JsonValue>> {
        Ok(self.store.find(review::COLLECTION, intent)?)
    }

    pub fn list_for_provider(
        &self,
        provider_id: ProviderId,
        intent: QueryIntent,
    ) -> DomainResult<Vec<JsonValue>> {
        let intent = intent.and_filter(FilterPredicate::eq(
            PARENT_REF_FIELD,
            JsonValue::String(provider_id.to_string()),
        ));
        Ok(self.store.find(review::COLLECTION, &intent)?)
    }

    pub fn get(&self, id: ReviewId) -> DomainResult<Review> {
        let doc = self
            .store
            .find_one(review::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        decode(doc)
    }

    /// Find-and-update with pre-image capture (see
    /// [`super::CourseRepository::update`]).
    pub fn update(&self, id: ReviewId, patch: JsonValue) -> DomainResult<Review> {
        let preimage = self
            .store
            .find_one(review::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        let parent_before = parent_ref(&preimage);

        self.hub.emit(&LifecycleEvent::before_update(
            review::COLLECTION,
            id.0,
            parent_before,
        ));

        let changes = sanitize_patch(patch, &[])?;
        if let Some(rating) = changes.get(review::RATING_FIELD) {
            let valid = rating.as_u64().is_some_and(|r| (1..=10).contains(&r));
            if !valid {
                return Err(DomainError::validation("rating must be between 1 and 10"));
            }
        }

        let post = self
            .store
            .update_one(
                review::COLLECTION,
                &id_filter(id.0),
                &JsonValue::Object(changes),
            )?
            .ok_or_else(DomainError::not_found)?;
        let parent_after = parent_ref(&post);

        self.hub.emit(&LifecycleEvent::after_update(
            review::COLLECTION,
            id.0,
            parent_before,
            parent_after,
        ));

        decode(post)
    }

    pub fn delete(&self, id: ReviewId) -> DomainResult<()> {
        let preimage = self
            .store
            .find_one(review::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        let parent_before = parent_ref(&preimage);

        self.hub.emit(&LifecycleEvent::before_delete(
            review::COLLECTION,
            id.0,
            parent_before,
        ));

        if self
            .store
            .delete_one(review::COLLECTION, &id_filter(id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        self.hub.emit(&LifecycleEvent::after_delete(
            review::COLLECTION,
            id.0,
            parent_before,
        ));

        Ok(())
    }
}
