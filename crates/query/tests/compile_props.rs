//! Property tests: the compiler is total and its invariants hold for
//! arbitrary, attacker-shaped input.

use proptest::prelude::*;

use campdex_query::{compile, Operator, ProjectionMode};

fn arbitrary_params() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((".{0,24}", ".{0,24}"), 0..16)
}

proptest! {
    // Totality: no input panics, and the compiled invariants always hold.
    #[test]
    fn compile_upholds_invariants(params in arbitrary_params()) {
        let intent = compile(params.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        prop_assert!(intent.pagination.limit >= 1);
        prop_assert!(!intent.sort.is_empty());

        for predicate in &intent.filter {
            prop_assert!(!predicate.field.is_empty());
            // The operator set is closed; list operators carry arrays,
            // scalar operators carry scalars.
            if predicate.op.takes_many() {
                prop_assert!(predicate.value.is_array());
            } else {
                prop_assert!(predicate.value.is_number() || predicate.value.is_string());
            }
        }
    }

    // Reserved keys shape the intent; they never leak into the filter.
    #[test]
    fn reserved_keys_never_filter(value in ".{0,24}") {
        let pairs = [("page", value.as_str()), ("limit", value.as_str()),
                     ("sort", value.as_str()), ("fields", value.as_str())];
        let intent = compile(pairs);

        prop_assert!(intent.filter.is_empty());
    }

    // For all page <= 0 or non-numeric, pagination falls back to page 1.
    #[test]
    fn bad_page_floors_to_first_page(page in prop_oneof![
        Just("abc".to_string()),
        Just(String::new()),
        (i64::MIN..=0i64).prop_map(|n| n.to_string()),
    ]) {
        let intent = compile([("page", page.as_str())]);

        prop_assert_eq!(intent.pagination.skip, 0);
    }

    // For all numeric X, field[gte]=X compiles to (field, Gte, X) numeric.
    #[test]
    fn gte_suffix_compiles_numeric(x in any::<i64>()) {
        let key = "tuition[gte]";
        let value = x.to_string();
        let intent = compile([(key, value.as_str())]);

        prop_assert_eq!(intent.filter.len(), 1);
        let predicate = &intent.filter[0];
        prop_assert_eq!(predicate.field.as_str(), "tuition");
        prop_assert_eq!(predicate.op, Operator::Gte);
        prop_assert_eq!(predicate.value.as_i64(), Some(x));
    }

    // An explicit fields list always yields an inclusive projection of
    // exactly the named fields.
    #[test]
    fn fields_projection_is_inclusive(names in prop::collection::vec("[a-z_]{1,12}", 1..6)) {
        let joined = names.join(",");
        let intent = compile([("fields", joined.as_str())]);

        prop_assert_eq!(intent.projection.mode, ProjectionMode::Include);
        prop_assert_eq!(intent.projection.fields, names);
    }
}
