use std::sync::Arc;

use serde_json::Value as JsonValue;

use campdex_catalog::{course, provider, Course, CourseDraft, CourseId, ProviderId, PARENT_REF_FIELD};
use campdex_core::{DomainError, DomainResult};
use campdex_events::{LifecycleEvent, LifecycleHub};
use campdex_query::{FilterPredicate, QueryIntent};

use crate::document_store::DocumentStore;

use super::{decode, encode, id_filter, parent_ref, sanitize_patch};

/// Course mutations and reads, wrapped in lifecycle hooks.
pub struct CourseRepository<S> {
    store: S,
    hub: Arc<LifecycleHub>,
}

impl<S> CourseRepository<S> {
    pub fn new(store: S, hub: Arc<LifecycleHub>) -> Self {
        Self { store, hub }
    }
}

impl<S> CourseRepository<S>
where
    S: DocumentStore,
{
    pub fn create(&self, provider_id: ProviderId, draft: CourseDraft) -> DomainResult<Course> {
        // The parent must exist; the store itself enforces no references.
        if self
            .store
            .find_one(provider::COLLECTION, &id_filter(provider_id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        let new_course = Course::from_draft(provider_id, draft)?;
        self.store
            .insert_many(course::COLLECTION, vec![encode(&new_course)?])?;

        self.hub.emit(&LifecycleEvent::after_create(
            course::COLLECTION,
            new_course.id.0,
            Some(provider_id.0),
        ));

        Ok(new_course)
    }

    pub fn list(&self, intent: &QueryIntent) -> DomainResult<Vec<JsonValue>> {
        Ok(self.store.find(course::COLLECTION, intent)?)
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
        Ok(self.store.find(course::COLLECTION, &intent)?)
    }

    pub fn get(&self, id: CourseId) -> DomainResult<Course> {
        let doc = self
            .store
            .find_one(course::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        decode(doc)
    }

    /// Find-and-update. The pre-image is fetched first: a filter-driven
    /// update can change the parent reference, and only the pre-image can
    /// say which parent owned the course before.
    pub fn update(&self, id: CourseId, patch: JsonValue) -> DomainResult<Course> {
        let preimage = self
            .store
            .find_one(course::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        let parent_before = parent_ref(&preimage);

        self.hub.emit(&LifecycleEvent::before_update(
            course::COLLECTION,
            id.0,
            parent_before,
        ));

        let changes = sanitize_patch(patch, &[])?;
        let post = self
            .store
            .update_one(
                course::COLLECTION,
                &id_filter(id.0),
                &JsonValue::Object(changes),
            )?
            .ok_or_else(DomainError::not_found)?;
        let parent_after = parent_ref(&post);

        self.hub.emit(&LifecycleEvent::after_update(
            course::COLLECTION,
            id.0,
            parent_before,
            parent_after,
        ));

        decode(post)
    }

    /// Find-and-delete; `parent_before` comes from the pre-image because the
    /// post-mutation state no longer exists.
    pub fn delete(&self, id: CourseId) -> DomainResult<()> {
        let preimage = self
            .store
            .find_one(course::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        let parent_before = parent_ref(&preimage);

        self.hub.emit(&LifecycleEvent::before_delete(
            course::COLLECTION,
            id.0,
            parent_before,
        ));

        if self
            .store
            .delete_one(course::COLLECTION, &id_filter(id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        self.hub.emit(&LifecycleEvent::after_delete(
            course::COLLECTION,
            id.0,
            parent_before,
        ));

        Ok(())
    }
}
