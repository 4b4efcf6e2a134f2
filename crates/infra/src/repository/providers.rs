use serde_json::Value as JsonValue;

use campdex_catalog::{provider, Provider, ProviderDraft, ProviderId};
use campdex_core::{DomainError, DomainResult};
use campdex_query::QueryIntent;

use crate::cascade::CascadeDeleter;
use crate::document_store::DocumentStore;

use super::{decode, encode, id_filter, sanitize_patch};

/// Provider (parent resource) persistence.
///
/// Providers emit no lifecycle events (the event contract covers child
/// mutations), but their deletion path owns the cascade: children go first,
/// and a failed cascade keeps the provider.
pub struct ProviderRepository<S> {
    store: S,
    cascade: CascadeDeleter<S>,
}

impl<S> ProviderRepository<S> {
    pub fn new(store: S, cascade: CascadeDeleter<S>) -> Self {
        Self { store, cascade }
    }
}

impl<S> ProviderRepository<S>
where
    S: DocumentStore,
{
    pub fn create(&self, draft: ProviderDraft) -> DomainResult<Provider> {
        let new_provider = Provider::from_draft(draft)?;
        self.store
            .insert_many(provider::COLLECTION, vec![encode(&new_provider)?])?;
        Ok(new_provider)
    }

    pub fn list(&self, intent: &QueryIntent) -> DomainResult<Vec<JsonValue>> {
        Ok(self.store.find(provider::COLLECTION, intent)?)
    }

    pub fn get(&self, id: ProviderId) -> DomainResult<Provider> {
        let doc = self
            .store
            .find_one(provider::COLLECTION, &id_filter(id.0))?
            .ok_or_else(DomainError::not_found)?;
        decode(doc)
    }

    /// Patch a provider.
    ///
    /// Derived fields are owned by the maintainers and stripped from the
    /// patch unconditionally; the slug follows the name rather than the
    /// caller.
    pub fn update(&self, id: ProviderId, patch: JsonValue) -> DomainResult<Provider> {
        let mut changes = sanitize_patch(patch, &provider::derived::ALL)?;
        changes.remove("slug");

        let renamed = match changes.get("name") {
            Some(name) => {
                let name = name
                    .as_str()
                    .map(str::trim)
                    .filter(|n| !n.is_empty() && n.len() <= 50)
                    .ok_or_else(|| {
                        DomainError::validation("provider name must be 1-50 characters")
                    })?;
                Some(provider::slugify(name))
            }
            None => None,
        };
        if let Some(slug) = renamed {
            changes.insert("slug".to_string(), JsonValue::String(slug));
        }

        let post = self
            .store
            .update_one(
                provider::COLLECTION,
                &id_filter(id.0),
                &JsonValue::Object(changes),
            )?
            .ok_or_else(DomainError::not_found)?;

        decode(post)
    }

    /// Delete a provider, cascading to its children first.
    ///
    /// The provider record is only removed once every child collection has
    /// been cleared; a storage failure mid-cascade leaves parent and
    /// survivors in place.
    pub fn delete(&self, id: ProviderId) -> DomainResult<()> {
        if self
            .store
            .find_one(provider::COLLECTION, &id_filter(id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        self.cascade.on_parent_delete(id.0)?;

        if self
            .store
            .delete_one(provider::COLLECTION, &id_filter(id.0))?
            .is_none()
        {
            return Err(DomainError::not_found());
        }

        tracing::info!(provider = %id, "provider deleted after cascade");
        Ok(())
    }
}
