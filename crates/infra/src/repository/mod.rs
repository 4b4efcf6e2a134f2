//! Repositories: the only writers of the document store.
//!
//! Child repositories (courses, reviews) implement the lifecycle-hook
//! contract: fetch a pre-image before mutating (find-and-mutate semantics),
//! then emit exactly one `After*` event per logical mutation once the store
//! has applied it. The dependency between "child write" and "parent
//! recompute" is visible here, not hidden in storage middleware.
//!
//! The API layer never touches the store directly and never writes derived
//! fields; inbound patches are sanitized before they reach the store.

pub mod courses;
pub mod providers;
pub mod reviews;

pub use courses::CourseRepository;
pub use providers::ProviderRepository;
pub use reviews::ReviewRepository;

use serde_json::{Map, Value as JsonValue};

use campdex_catalog::PARENT_REF_FIELD;
use campdex_core::{DomainError, DomainResult, ResourceId};
use campdex_query::{fields, FilterPredicate};

/// Fields no caller may change on any document.
const IMMUTABLE_FIELDS: [&str; 3] = ["id", "created_at", fields::REVISION];

fn id_filter(id: ResourceId) -> [FilterPredicate; 1] {
    [FilterPredicate::eq("id", JsonValue::String(id.to_string()))]
}

/// Parent reference of a stored child document, if any.
fn parent_ref(doc: &JsonValue) -> Option<ResourceId> {
    doc.get(PARENT_REF_FIELD)
        .and_then(JsonValue::as_str)
        .and_then(|raw| raw.parse().ok())
}

/// Require an object payload and strip fields the caller may not set.
fn sanitize_patch(patch: JsonValue, blocked: &[&str]) -> DomainResult<Map<String, JsonValue>> {
    let JsonValue::Object(mut patch) = patch else {
        return Err(DomainError::validation(
            "update payload must be a JSON object",
        ));
    };

    patch.retain(|key, _| {
        !IMMUTABLE_FIELDS.contains(&key.as_str()) && !blocked.contains(&key.as_str())
    });

    Ok(patch)
}

/// Decode a stored document into its typed form.
///
/// Failure here means the stored document no longer matches the catalog
/// shape, which is a storage-integrity problem, not caller error.
fn decode<T: serde::de::DeserializeOwned>(doc: JsonValue) -> DomainResult<T> {
    serde_json::from_value(doc)
        .map_err(|e| DomainError::storage(format!("malformed stored document: {e}")))
}

fn encode<T: serde::Serialize>(value: &T) -> DomainResult<JsonValue> {
    serde_json::to_value(value)
        .map_err(|e| DomainError::storage(format!("document serialization failed: {e}")))
}
