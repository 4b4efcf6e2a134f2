//! Request parameters → [`QueryIntent`].
//!
//! The input is whatever the HTTP layer parsed out of the query string: an
//! ordered sequence of `(key, value)` pairs. Reserved keys (`page`, `limit`,
//! `sort`, `fields`) shape the window/ordering/projection; every remaining key
//! is a candidate filter field, optionally carrying a bracketed operator
//! suffix (`tuition[gte]=500`).
//!
//! The compiler is total. Malformed pieces (non-numeric page numbers,
//! unrecognized operator tokens, empty field names) are absorbed into
//! defaults or dropped, never raised to the caller.

use serde_json::Value as JsonValue;

use crate::intent::{
    FilterPredicate, Operator, Pagination, Projection, QueryIntent, SortDirection, SortKey,
};

const RESERVED_KEYS: [&str; 4] = ["page", "limit", "sort", "fields"];

/// Compile request parameters into a structured query intent.
///
/// Duplicate keys follow map semantics: the last occurrence wins, for
/// reserved and filter keys alike.
pub fn compile<I, K, V>(params: I) -> QueryIntent
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut page: Option<String> = None;
    let mut limit: Option<String> = None;
    let mut sort: Option<String> = None;
    let mut fields: Option<String> = None;

    // Preserve first-seen ordering of filter fields while letting later
    // duplicates overwrite earlier values.
    let mut filter_keys: Vec<String> = Vec::new();
    let mut filter_values: Vec<String> = Vec::new();

    for (key, value) in params {
        let key = key.as_ref();
        let value = value.as_ref();

        match key {
            "page" => page = Some(value.to_string()),
            "limit" => limit = Some(value.to_string()),
            "sort" => sort = Some(value.to_string()),
            "fields" => fields = Some(value.to_string()),
            _ => match filter_keys.iter().position(|k| k == key) {
                Some(idx) => filter_values[idx] = value.to_string(),
                None => {
                    filter_keys.push(key.to_string());
                    filter_values.push(value.to_string());
                }
            },
        }
    }

    let filter = filter_keys
        .iter()
        .zip(filter_values.iter())
        .filter_map(|(key, value)| compile_predicate(key, value))
        .collect();

    QueryIntent {
        filter,
        sort: compile_sort(sort.as_deref()),
        projection: compile_projection(fields.as_deref()),
        pagination: compile_pagination(page.as_deref(), limit.as_deref()),
    }
}

/// Compile one non-reserved `key=value` pair into a predicate.
///
/// Returns `None` when the pair cannot be expressed inside the closed operator
/// set: an unrecognized bracketed token never corrupts the field name and
/// never passes through as a literal bracketed key; the pair is dropped.
fn compile_predicate(key: &str, value: &str) -> Option<FilterPredicate> {
    debug_assert!(!RESERVED_KEYS.contains(&key));

    let (field, op) = match split_operator(key) {
        Some((field, token)) => match Operator::from_token(token) {
            Some(op) => (field, op),
            None => {
                tracing::debug!(key, token, "dropping filter with unrecognized operator");
                return None;
            }
        },
        None => (key, Operator::Eq),
    };

    if field.is_empty() {
        tracing::debug!(key, "dropping filter with empty field name");
        return None;
    }

    let value = if op.takes_many() {
        JsonValue::Array(value.split(',').map(coerce_scalar).collect())
    } else {
        coerce_scalar(value)
    };

    Some(FilterPredicate::new(field, op, value))
}

/// Split `field[token]` into its parts; `None` when the key has no complete
/// bracket suffix (such keys are plain field names).
fn split_operator(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let rest = &key[open + 1..];
    let close = rest.find(']')?;

    // Trailing bytes after the closing bracket make the suffix malformed;
    // treat the whole key as a literal field name.
    if open + 1 + close + 1 != key.len() {
        return None;
    }

    Some((&key[..open], &rest[..close]))
}

/// Numeric-looking values become JSON numbers; everything else stays a string.
fn coerce_scalar(raw: &str) -> JsonValue {
    if let Ok(n) = raw.parse::<i64>() {
        return JsonValue::from(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        if f.is_finite() {
            // from_f64 only fails on non-finite values, checked above.
            if let Some(n) = serde_json::Number::from_f64(f) {
                return JsonValue::Number(n);
            }
        }
    }
    JsonValue::from(raw)
}

fn compile_sort(raw: Option<&str>) -> Vec<SortKey> {
    let Some(raw) = raw else {
        return SortKey::default_sort();
    };

    let keys: Vec<SortKey> = raw
        .split(',')
        .filter_map(|segment| {
            let (direction, field) = match segment.strip_prefix('-') {
                Some(field) => (SortDirection::Desc, field),
                None => (SortDirection::Asc, segment),
            };
            if field.is_empty() {
                return None;
            }
            Some(SortKey {
                field: field.to_string(),
                direction,
            })
        })
        .collect();

    // At least one sort key is always present.
    if keys.is_empty() {
        SortKey::default_sort()
    } else {
        keys
    }
}

fn compile_projection(raw: Option<&str>) -> Projection {
    let Some(raw) = raw else {
        return Projection::default();
    };

    let fields: Vec<String> = raw
        .split(',')
        .filter(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    if fields.is_empty() {
        Projection::default()
    } else {
        Projection::include(fields)
    }
}

fn compile_pagination(page: Option<&str>, limit: Option<&str>) -> Pagination {
    let page = parse_positive(page).unwrap_or(1);
    let limit = parse_positive(limit).unwrap_or(Pagination::DEFAULT_LIMIT);
    Pagination::from_page(page, limit)
}

/// Strictly positive integer, or `None` for anything else (non-numeric,
/// zero, negative).
fn parse_positive(raw: Option<&str>) -> Option<u64> {
    let value = raw?.parse::<i64>().ok()?;
    u64::try_from(value).ok().filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::intent::{fields, ProjectionMode};

    fn compiled(pairs: &[(&str, &str)]) -> QueryIntent {
        compile(pairs.iter().copied())
    }

    #[test]
    fn empty_input_yields_pure_defaults() {
        let intent = compiled(&[]);

        assert!(intent.filter.is_empty());
        assert_eq!(intent.sort, vec![SortKey::desc(fields::CREATED_AT)]);
        assert_eq!(
            intent.projection,
            Projection::exclude(vec![fields::REVISION.to_string()])
        );
        assert_eq!(intent.pagination, Pagination { skip: 0, limit: 10 });
    }

    #[test]
    fn bracketed_operator_becomes_typed_predicate() {
        let intent = compiled(&[("tuition[gte]", "500")]);

        assert_eq!(
            intent.filter,
            vec![FilterPredicate::new("tuition", Operator::Gte, json!(500))]
        );
    }

    #[test]
    fn bare_key_means_equality() {
        let intent = compiled(&[("minimum_skill", "beginner")]);

        assert_eq!(
            intent.filter,
            vec![FilterPredicate::eq("minimum_skill", json!("beginner"))]
        );
    }

    #[test]
    fn in_values_are_comma_split_and_coerced() {
        let intent = compiled(&[("tuition[in]", "100,200,cheap")]);

        assert_eq!(
            intent.filter,
            vec![FilterPredicate::new(
                "tuition",
                Operator::In,
                json!([100, 200, "cheap"])
            )]
        );
    }

    #[test]
    fn unrecognized_operator_drops_the_pair() {
        let intent = compiled(&[("tuition[xyz]", "500"), ("weeks", "6")]);

        assert_eq!(intent.filter, vec![FilterPredicate::eq("weeks", json!(6))]);
    }

    #[test]
    fn floats_coerce_to_numbers() {
        let intent = compiled(&[("rating[gt]", "7.5")]);

        assert_eq!(
            intent.filter,
            vec![FilterPredicate::new("rating", Operator::Gt, json!(7.5))]
        );
    }

    #[test]
    fn sort_leading_dash_means_descending() {
        let intent = compiled(&[("sort", "-tuition,title")]);

        assert_eq!(
            intent.sort,
            vec![SortKey::desc("tuition"), SortKey::asc("title")]
        );
    }

    #[test]
    fn degenerate_sort_falls_back_to_default() {
        let intent = compiled(&[("sort", ",-,")]);

        assert_eq!(intent.sort, SortKey::default_sort());
    }

    #[test]
    fn fields_list_becomes_inclusive_projection() {
        let intent = compiled(&[("fields", "title,tuition")]);

        assert_eq!(intent.projection.mode, ProjectionMode::Include);
        assert_eq!(intent.projection.fields, vec!["title", "tuition"]);
    }

    #[test]
    fn pagination_computes_skip_from_page() {
        let intent = compiled(&[("page", "3"), ("limit", "25")]);

        assert_eq!(intent.pagination, Pagination { skip: 50, limit: 25 });
    }

    // Scenario: page=abc&limit=-3 compiles to page=1, limit=10.
    #[test]
    fn malformed_pagination_is_floored_to_defaults() {
        let intent = compiled(&[("page", "abc"), ("limit", "-3")]);

        assert_eq!(intent.pagination, Pagination { skip: 0, limit: 10 });
    }

    #[test]
    fn zero_page_is_floored_too() {
        let intent = compiled(&[("page", "0"), ("limit", "0")]);

        assert_eq!(intent.pagination, Pagination { skip: 0, limit: 10 });
    }

    #[test]
    fn duplicate_keys_last_occurrence_wins() {
        let intent = compiled(&[("page", "2"), ("page", "4"), ("weeks", "1"), ("weeks", "2")]);

        assert_eq!(intent.pagination.skip, 30);
        assert_eq!(intent.filter, vec![FilterPredicate::eq("weeks", json!(2))]);
    }

    // Full worked example: bounded tuition range, descending sort, second
    // page of five, two projected fields.
    #[test]
    fn combined_query_compiles_end_to_end() {
        let intent = compiled(&[
            ("tuition[gte]", "500"),
            ("tuition[lte]", "1000"),
            ("sort", "-tuition"),
            ("page", "2"),
            ("limit", "5"),
            ("fields", "title,tuition"),
        ]);

        assert_eq!(
            intent.filter,
            vec![
                FilterPredicate::new("tuition", Operator::Gte, json!(500)),
                FilterPredicate::new("tuition", Operator::Lte, json!(1000)),
            ]
        );
        assert_eq!(intent.sort, vec![SortKey::desc("tuition")]);
        assert_eq!(intent.pagination, Pagination { skip: 5, limit: 5 });
        assert_eq!(intent.projection, Projection::include(vec![
            "title".to_string(),
            "tuition".to_string(),
        ]));
    }

    #[test]
    fn reserved_keys_never_become_filters() {
        let intent = compiled(&[
            ("page", "1"),
            ("limit", "10"),
            ("sort", "title"),
            ("fields", "title"),
        ]);

        assert!(intent.filter.is_empty());
    }

    #[test]
    fn malformed_bracket_key_is_a_literal_field() {
        // No closing bracket: not an operator suffix, equality on the raw key.
        let intent = compiled(&[("tuition[gte", "500")]);

        assert_eq!(
            intent.filter,
            vec![FilterPredicate::eq("tuition[gte", json!(500))]
        );
    }
}
