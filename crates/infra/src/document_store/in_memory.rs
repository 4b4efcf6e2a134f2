//! In-memory document store.
//!
//! Intended for tests/dev. Not optimized for performance: every operation
//! scans the collection, which matches the cost model the maintainers are
//! specified against (full rescan per recompute).

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::{Map, Value as JsonValue};

use campdex_query::{
    fields, FilterPredicate, Operator, Projection, ProjectionMode, QueryIntent, SortDirection,
    SortKey,
};

use super::{DocumentStore, GroupRow, StoreError};

/// In-memory, collection-per-name document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<JsonValue>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn poisoned() -> StoreError {
        StoreError::Unavailable("lock poisoned".to_string())
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn find(&self, collection: &str, intent: &QueryIntent) -> Result<Vec<JsonValue>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched: Vec<&JsonValue> = docs
            .iter()
            .filter(|doc| matches_all(doc, &intent.filter))
            .collect();

        sort_documents(&mut matched, &intent.sort);

        let skip = usize::try_from(intent.pagination.skip).unwrap_or(usize::MAX);
        let limit = usize::try_from(intent.pagination.limit).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(skip)
            .take(limit)
            .map(|doc| project(doc, &intent.projection))
            .collect())
    }

    fn find_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        Ok(docs
            .iter()
            .find(|doc| matches_all(doc, filter))
            .cloned())
    }

    fn insert_many(
        &self,
        collection: &str,
        documents: Vec<JsonValue>,
    ) -> Result<Vec<JsonValue>, StoreError> {
        let mut stored = Vec::with_capacity(documents.len());
        for mut doc in documents {
            let Some(object) = doc.as_object_mut() else {
                return Err(StoreError::InvalidDocument(
                    "documents must be JSON objects".to_string(),
                ));
            };
            object.insert(fields::REVISION.to_string(), JsonValue::from(0u64));
            stored.push(doc);
        }

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(stored.iter().cloned());

        Ok(stored)
    }

    fn update_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        changes: &JsonValue,
    ) -> Result<Option<JsonValue>, StoreError> {
        let Some(changes) = changes.as_object() else {
            return Err(StoreError::InvalidDocument(
                "change set must be a JSON object".to_string(),
            ));
        };

        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = match collections.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(None),
        };

        let Some(doc) = docs.iter_mut().find(|doc| matches_all(doc, filter)) else {
            return Ok(None);
        };
        let Some(object) = doc.as_object_mut() else {
            return Err(StoreError::InvalidDocument(
                "stored document is not an object".to_string(),
            ));
        };

        for (key, value) in changes {
            object.insert(key.clone(), value.clone());
        }
        bump_revision(object);

        Ok(Some(doc.clone()))
    }

    fn delete_one(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<Option<JsonValue>, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = match collections.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(None),
        };

        match docs.iter().position(|doc| matches_all(doc, filter)) {
            Some(idx) => Ok(Some(docs.remove(idx))),
            None => Ok(None),
        }
    }

    fn delete_many(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
    ) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().map_err(|_| Self::poisoned())?;
        let docs = match collections.get_mut(collection) {
            Some(docs) => docs,
            None => return Ok(0),
        };

        let before = docs.len();
        docs.retain(|doc| !matches_all(doc, filter));
        Ok((before - docs.len()) as u64)
    }

    fn aggregate_group(
        &self,
        collection: &str,
        filter: &[FilterPredicate],
        group_key: &str,
        value_field: &str,
    ) -> Result<Vec<GroupRow>, StoreError> {
        let collections = self.collections.read().map_err(|_| Self::poisoned())?;
        let docs = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        // Group key identity is the value's JSON text; order of first
        // appearance is preserved so results are deterministic.
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, (JsonValue, Vec<f64>, u64)> = HashMap::new();

        for doc in docs.iter().filter(|doc| matches_all(doc, filter)) {
            let key = doc.get(group_key).cloned().unwrap_or(JsonValue::Null);
            let key_text = key.to_string();

            let entry = groups.entry(key_text.clone()).or_insert_with(|| {
                order.push(key_text);
                (key, Vec::new(), 0)
            });
            entry.2 += 1;
            if let Some(value) = doc.get(value_field).and_then(numeric) {
                entry.1.push(value);
            }
        }

        Ok(order
            .into_iter()
            .filter_map(|key_text| groups.remove(&key_text))
            .map(|(key, values, count)| {
                let sum: f64 = values.iter().sum();
                let avg = if values.is_empty() {
                    0.0
                } else {
                    sum / values.len() as f64
                };
                GroupRow {
                    key,
                    avg,
                    sum,
                    count,
                }
            })
            .collect())
    }
}

fn bump_revision(object: &mut Map<String, JsonValue>) {
    let next = object
        .get(fields::REVISION)
        .and_then(JsonValue::as_u64)
        .map(|rev| rev + 1)
        .unwrap_or(0);
    object.insert(fields::REVISION.to_string(), JsonValue::from(next));
}

fn matches_all(doc: &JsonValue, filter: &[FilterPredicate]) -> bool {
    filter.iter().all(|predicate| matches(doc, predicate))
}

/// Evaluate one predicate against a document.
///
/// Missing fields follow the usual document-store semantics: they fail
/// equality and ordering comparisons but satisfy the negated operators
/// (`Ne`, `NotIn`).
fn matches(doc: &JsonValue, predicate: &FilterPredicate) -> bool {
    let field = doc.get(&predicate.field);

    match predicate.op {
        Operator::Eq => field.is_some_and(|v| values_equal(v, &predicate.value)),
        Operator::Ne => !field.is_some_and(|v| values_equal(v, &predicate.value)),
        Operator::Gt => compare(field, &predicate.value)
            .is_some_and(|ordering| ordering == Ordering::Greater),
        Operator::Gte => compare(field, &predicate.value)
            .is_some_and(|ordering| ordering != Ordering::Less),
        Operator::Lt => {
            compare(field, &predicate.value).is_some_and(|ordering| ordering == Ordering::Less)
        }
        Operator::Lte => compare(field, &predicate.value)
            .is_some_and(|ordering| ordering != Ordering::Greater),
        Operator::In => member_of(field, &predicate.value),
        Operator::NotIn => !member_of(field, &predicate.value),
    }
}

fn member_of(field: Option<&JsonValue>, candidates: &JsonValue) -> bool {
    let Some(value) = field else {
        return false;
    };
    let Some(candidates) = candidates.as_array() else {
        // Defensive: a scalar candidate degrades to equality.
        return values_equal(value, candidates);
    };

    candidates.iter().any(|candidate| {
        // An array-valued field is a member when any element matches
        // (document-store array semantics).
        if let Some(elements) = value.as_array() {
            elements.iter().any(|element| values_equal(element, candidate))
        } else {
            values_equal(value, candidate)
        }
    })
}

/// Equality with cross-representation numeric comparison (1 == 1.0).
fn values_equal(a: &JsonValue, b: &JsonValue) -> bool {
    match (numeric(a), numeric(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

fn compare(field: Option<&JsonValue>, bound: &JsonValue) -> Option<Ordering> {
    order_values(field?, bound)
}

/// Total order over comparable JSON scalars; `None` for mixed or
/// non-scalar comparisons (which never match range operators).
fn order_values(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (numeric(a), numeric(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        _ => None,
    }
}

fn numeric(value: &JsonValue) -> Option<f64> {
    value.as_f64()
}

fn sort_documents(docs: &mut [&JsonValue], keys: &[SortKey]) {
    docs.sort_by(|a, b| {
        for key in keys {
            let ordering = order_fields(a.get(&key.field), b.get(&key.field));
            let ordering = match key.direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Missing fields sort before present ones (ascending).
fn order_fields(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => order_values(a, b).unwrap_or(Ordering::Equal),
    }
}

/// Apply a projection to one document.
///
/// Inclusive projections always keep the document identity field, the way
/// document stores keep their primary key unless explicitly suppressed.
fn project(doc: &JsonValue, projection: &Projection) -> JsonValue {
    let Some(object) = doc.as_object() else {
        return doc.clone();
    };

    let projected: Map<String, JsonValue> = match projection.mode {
        ProjectionMode::Include => object
            .iter()
            .filter(|(key, _)| key.as_str() == "id" || projection.fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
        ProjectionMode::Exclude => object
            .iter()
            .filter(|(key, _)| !projection.fields.iter().any(|f| f == *key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect(),
    };

    JsonValue::Object(projected)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use campdex_query::compile;

    use super::*;

    fn seeded() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many(
                "courses",
                vec![
                    json!({"id": "a", "title": "rust basics", "tuition": 400, "created_at": "2026-01-01T00:00:00Z"}),
                    json!({"id": "b", "title": "async rust", "tuition": 800, "created_at": "2026-01-02T00:00:00Z"}),
                    json!({"id": "c", "title": "systems", "tuition": 1200, "created_at": "2026-01-03T00:00:00Z"}),
                ],
            )
            .unwrap();
        store
    }

    #[test]
    fn range_filter_selects_matching_documents() {
        let store = seeded();
        let intent = compile([("tuition[gte]", "500"), ("tuition[lte]", "1000")]);

        let found = store.find("courses", &intent).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!("b"));
    }

    #[test]
    fn default_sort_is_newest_first() {
        let store = seeded();
        let found = store.find("courses", &QueryIntent::default()).unwrap();

        let ids: Vec<_> = found.iter().map(|d| d["id"].clone()).collect();
        assert_eq!(ids, vec![json!("c"), json!("b"), json!("a")]);
    }

    #[test]
    fn pagination_windows_the_result() {
        let store = seeded();
        let intent = compile([("sort", "tuition"), ("page", "2"), ("limit", "2")]);

        let found = store.find("courses", &intent).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0]["id"], json!("c"));
    }

    #[test]
    fn inclusive_projection_keeps_identity() {
        let store = seeded();
        let intent = compile([("fields", "tuition")]);

        let found = store.find("courses", &intent).unwrap();
        let object = found[0].as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key("id"));
        assert!(object.contains_key("tuition"));
    }

    #[test]
    fn default_projection_hides_the_revision_field() {
        let store = seeded();
        let found = store.find("courses", &QueryIntent::default()).unwrap();

        assert!(found[0].get(fields::REVISION).is_none());
    }

    #[test]
    fn update_one_merges_and_bumps_revision() {
        let store = seeded();
        let filter = [FilterPredicate::eq("id", json!("a"))];

        let updated = store
            .update_one("courses", &filter, &json!({"tuition": 450}))
            .unwrap()
            .unwrap();

        assert_eq!(updated["tuition"], json!(450));
        assert_eq!(updated["title"], json!("rust basics"));
        assert_eq!(updated[fields::REVISION], json!(1));
    }

    #[test]
    fn update_one_without_match_returns_none() {
        let store = seeded();
        let filter = [FilterPredicate::eq("id", json!("nope"))];

        let updated = store
            .update_one("courses", &filter, &json!({"tuition": 450}))
            .unwrap();
        assert!(updated.is_none());
    }

    #[test]
    fn delete_one_returns_the_pre_image() {
        let store = seeded();
        let filter = [FilterPredicate::eq("id", json!("b"))];

        let removed = store.delete_one("courses", &filter).unwrap().unwrap();
        assert_eq!(removed["tuition"], json!(800));

        assert!(store.find_one("courses", &filter).unwrap().is_none());
    }

    #[test]
    fn ne_matches_documents_missing_the_field() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many("docs", vec![json!({"id": "x"}), json!({"id": "y", "kind": "a"})])
            .unwrap();

        let filter = [FilterPredicate::new("kind", Operator::Ne, json!("a"))];
        let found = store.find_one("docs", &filter).unwrap().unwrap();
        assert_eq!(found["id"], json!("x"));
    }

    #[test]
    fn in_accepts_scalar_against_array_candidates() {
        let store = seeded();
        let intent = QueryIntent::default()
            .and_filter(FilterPredicate::new("tuition", Operator::In, json!([400, 1200])));

        let found = store.find("courses", &intent).unwrap();
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn integers_and_floats_compare_numerically() {
        let store = seeded();
        let filter = [FilterPredicate::eq("tuition", json!(400.0))];

        assert!(store.find_one("courses", &filter).unwrap().is_some());
    }

    #[test]
    fn aggregate_group_averages_and_counts() {
        let store = InMemoryDocumentStore::new();
        store
            .insert_many(
                "courses",
                vec![
                    json!({"provider_id": "p1", "tuition": 100}),
                    json!({"provider_id": "p1", "tuition": 200}),
                    json!({"provider_id": "p1", "tuition": 300}),
                    json!({"provider_id": "p2", "tuition": 999}),
                ],
            )
            .unwrap();

        let filter = [FilterPredicate::eq("provider_id", json!("p1"))];
        let rows = store
            .aggregate_group("courses", &filter, "provider_id", "tuition")
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, json!("p1"));
        assert_eq!(rows[0].avg, 200.0);
        assert_eq!(rows[0].sum, 600.0);
        assert_eq!(rows[0].count, 3);
    }

    #[test]
    fn aggregate_group_over_empty_match_returns_no_rows() {
        let store = seeded();
        let filter = [FilterPredicate::eq("provider_id", json!("absent"))];

        let rows = store
            .aggregate_group("courses", &filter, "provider_id", "tuition")
            .unwrap();
        assert!(rows.is_empty());
    }
}
