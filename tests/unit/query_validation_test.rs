// Property-based tests for list query validation
//
// - limit is accepted in 1..=100 and rejected above, never clamped
// - offset = (page - 1) * limit
// - errors are scoped to the offending field
// - unknown parameters are ignored

use std::collections::HashMap;

use ngopi::core::query::MAX_LIMIT;
use ngopi::core::{Resource, ResourceQuery};
use ngopi::modules::cafes::{CafeType, Cafes};
use ngopi::modules::reviews::{Rating, Reviews, VisitorType};
use ngopi::modules::shared::ContentStatus;
use proptest::prelude::*;

fn raw(pairs: &[(&str, String)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

proptest! {
    #[test]
    fn test_limit_within_bound_is_accepted(page in 1u32..10_000, limit in 1u32..=MAX_LIMIT) {
        let query = ResourceQuery::from_params(
            &raw(&[("page", page.to_string()), ("limit", limit.to_string())]),
            Cafes::parse_filter,
        )
        .unwrap();

        prop_assert_eq!(query.page, page);
        prop_assert_eq!(query.limit, limit);
        prop_assert_eq!(query.offset(), u64::from(page - 1) * u64::from(limit));
    }

    #[test]
    fn test_limit_above_bound_is_rejected(limit in (MAX_LIMIT + 1)..100_000u32) {
        let errors = ResourceQuery::from_params(
            &raw(&[("limit", limit.to_string())]),
            Cafes::parse_filter,
        )
        .unwrap_err();

        prop_assert_eq!(errors.field("limit").unwrap(), ["must be at most 100"]);
        prop_assert!(errors.field("page").is_none());
    }

    #[test]
    fn test_non_numeric_page_is_field_scoped(page in "[a-z]{1,6}") {
        let errors = ResourceQuery::from_params(&raw(&[("page", page)]), Cafes::parse_filter)
            .unwrap_err();

        prop_assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["page"]);
    }
}

#[test]
fn test_unknown_parameters_are_ignored() {
    let query = ResourceQuery::from_params(
        &raw(&[("sort", "name".to_string()), ("utm_source", "x".to_string())]),
        Cafes::parse_filter,
    )
    .unwrap();

    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 10);
}

#[test]
fn test_cafe_filters() {
    let query = ResourceQuery::from_params(
        &raw(&[
            ("cafeType", "ROASTERY".to_string()),
            ("contentStatus", "ARCHIVED".to_string()),
            ("search", "  kopi ".to_string()),
        ]),
        Cafes::parse_filter,
    )
    .unwrap();

    assert_eq!(query.filter.cafe_type, Some(CafeType::Roastery));
    assert_eq!(query.filter.content_status, Some(ContentStatus::Archived));
    assert_eq!(query.search.as_deref(), Some("kopi"));
}

#[test]
fn test_enum_filters_are_not_silently_dropped() {
    let errors = ResourceQuery::from_params(
        &raw(&[
            ("rating", "6".to_string()),
            ("visitorType", "student".to_string()),
            ("cafeId", "0".to_string()),
        ]),
        Reviews::parse_filter,
    )
    .unwrap_err();

    assert_eq!(errors.field("rating").unwrap(), ["must be one of: 1, 2, 3, 4, 5"]);
    assert!(errors.field("visitorType").is_some());
    assert_eq!(errors.field("cafeId").unwrap(), ["must be a positive integer id"]);
}

#[test]
fn test_review_filters() {
    let query = ResourceQuery::from_params(
        &raw(&[
            ("rating", "3".to_string()),
            ("visitorType", "FAMILY".to_string()),
        ]),
        Reviews::parse_filter,
    )
    .unwrap();

    assert_eq!(query.filter.rating, Rating::new(3));
    assert_eq!(query.filter.visitor_type, Some(VisitorType::Family));
}

#[test]
fn test_id_lookup() {
    let query =
        ResourceQuery::from_params(&raw(&[("id", "17".to_string())]), Cafes::parse_filter).unwrap();
    assert_eq!(query.id, Some(17));
}
