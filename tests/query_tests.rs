//! End-to-end query tests over a small user collection.
//!
//! Covers the public builder surface: condition operators, boolean
//! composition, the filtering (empty-dropping) variants, ordering,
//! pagination, existence, and aggregates.

use arrayquery::{ArrayQuery, QueryError, SortDirection};
use serde_json::json;

fn create_query() -> ArrayQuery {
    let mut query = ArrayQuery::new();
    query.from(vec![
        json!({"id": 1, "username": "admin", "email": "admin@example.com", "amount": 100}),
        json!({"id": 2, "username": "test", "email": "test@example.com", "amount": 200}),
        json!({"id": 3, "username": "guest", "email": "guest@example.com", "amount": 300}),
    ]);
    query
}

#[test]
fn test_where_condition() {
    let mut query = create_query();
    query.where_(json!({"username": "admin"})).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows[0]["username"], "admin");
}

#[test]
fn test_like_condition() {
    let mut query = create_query();
    query.where_(json!(["like", "email", "test"])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "test");
}

#[test]
fn test_not_like_condition() {
    let mut query = create_query();
    query.where_(json!(["not like", "username", "admin"])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_apply_limit() {
    let mut query = create_query();
    query.where_(json!(["like", "email", "example.com"])).unwrap();
    query.limit(2);
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "test");
}

#[test]
fn test_fetch_first_row() {
    let query = create_query();
    let row = query.one().unwrap().unwrap();

    assert_eq!(row["username"], "admin");
}

#[test]
fn test_or_condition() {
    let mut query = create_query();
    query
        .where_(json!(["or", {"username": "admin"}, {"id": 3}]))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["id"], 3);
}

#[test]
fn test_between_condition() {
    let mut query = create_query();
    query.where_(json!(["between", "id", 1, 2])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "test");
}

#[test]
fn test_not_condition() {
    let mut query = create_query();
    query.where_(json!(["not", {"username": "admin"}])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "test");
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_in_condition() {
    let mut query = create_query();
    query.where_(json!(["in", "id", [1, 3]])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_not_in_condition() {
    let mut query = create_query();
    query.where_(json!(["not in", "id", [1, 3]])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "test");
}

#[test]
fn test_exists_condition() {
    let mut query = create_query();
    query.where_(json!({"username": "admin"})).unwrap();

    assert!(query.exists().unwrap());

    query.where_(json!({"username": "nobody"})).unwrap();
    assert!(!query.exists().unwrap());
}

#[test]
fn test_order_by_asc() {
    let mut query = create_query();
    query.order_by("email");
    let rows = query.all().unwrap();

    assert_eq!(rows[0]["username"], "admin");
}

#[test]
fn test_order_by_desc() {
    let mut query = create_query();
    query.order_by(("email", SortDirection::Desc));
    let rows = query.all().unwrap();

    assert_eq!(rows[0]["username"], "test");
}

#[test]
fn test_filter_where_condition() {
    let mut query = create_query();
    query.filter_where(json!({"username": "admin"})).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "admin");
}

#[test]
fn test_filter_and_condition() {
    let mut query = create_query();
    query.filter_where(json!({"username": "guest"})).unwrap();
    query
        .and_filter_where(json!({"email": "guest@example.com"}))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "guest");
}

#[test]
fn test_filter_and_condition_drops_empty_value() {
    let mut query = create_query();
    query.filter_where(json!({"username": "guest"})).unwrap();
    query.and_filter_where(json!({"email": ""})).unwrap();
    let rows = query.all().unwrap();

    // The empty-valued condition contributed nothing.
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "guest");
}

#[test]
fn test_filter_or_condition() {
    let mut query = create_query();
    query.filter_where(json!({"username": "guest"})).unwrap();
    query.or_filter_where(json!({"username": "admin"})).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_filter_not_condition() {
    let mut query = create_query();
    query
        .filter_where(json!(["not", {"username": "guest"}]))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "test");
}

#[test]
fn test_filter_between_condition() {
    let mut query = create_query();
    query.filter_where(json!(["between", "id", 2, 3])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "test");
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_filter_in_condition() {
    let mut query = create_query();
    query.filter_where(json!(["in", "id", [1, 2, 3]])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "test");
    assert_eq!(rows[2]["username"], "guest");
}

#[test]
fn test_filter_like_condition() {
    let mut query = create_query();
    query.filter_where(json!(["like", "username", "gu"])).unwrap();
    query
        .or_filter_where(json!(["like", "username", "ad"]))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["username"], "admin");
    assert_eq!(rows[1]["username"], "guest");
}

#[test]
fn test_fully_filtered_where_matches_all() {
    let mut query = create_query();
    query
        .filter_where(json!({"username": "", "email": null}))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 3);
}

#[test]
fn test_set_custom_primary_key() {
    let mut query = create_query();
    query.primary_key_name = "username".to_string();
    query.where_(json!(["not", {"username": "admin"}])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(query.primary_key_name, "username");
}

#[test]
fn test_greater_than_condition() {
    let mut query = create_query();
    query.where_(json!([">", "id", 1])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
}

#[test]
fn test_less_than_condition() {
    let mut query = create_query();
    query.where_(json!(["<", "id", 2])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 1);
}

#[test]
fn test_greater_than_or_equal_condition() {
    let mut query = create_query();
    query.where_(json!([">=", "id", 2])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["id"], 3);
}

#[test]
fn test_less_than_or_equal_condition() {
    let mut query = create_query();
    query.where_(json!(["<=", "id", 2])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
}

#[test]
fn test_equal_condition() {
    let mut query = create_query();
    query.where_(json!(["=", "id", 1])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["id"], 1);
}

#[test]
fn test_not_equal_condition() {
    let mut query = create_query();
    query.where_(json!(["!=", "id", 1])).unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 2);
    assert_eq!(rows[1]["id"], 3);
}

#[test]
fn test_sum() {
    let mut query = create_query();
    query.where_(json!(["like", "email", "est"])).unwrap();
    let sum = query.sum("amount").unwrap();

    assert_eq!(sum, 500.0);
}

#[test]
fn test_average() {
    let mut query = create_query();
    query.where_(json!(["like", "email", "est"])).unwrap();
    let average = query.average("amount").unwrap();

    assert_eq!(average, 250.0);
}

#[test]
fn test_limit_without_order_preserves_source_order() {
    let mut query = create_query();
    query.limit(2);
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 1);
    assert_eq!(rows[1]["id"], 2);
}

#[test]
fn test_offset_with_order() {
    let mut query = create_query();
    query.order_by(("id", SortDirection::Desc)).offset(1).limit(2);
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 2);
    assert_eq!(rows[1]["id"], 1);
}

#[test]
fn test_records_keep_field_order() {
    let record = json!({"zeta": 1, "alpha": 2, "mid": 3});
    let mut query = ArrayQuery::new();
    query.from(vec![record.clone()]);
    let rows = query.all().unwrap();

    // Records pass through untouched, fields and all.
    assert_eq!(rows[0], record);
}

#[test]
fn test_malformed_condition_is_reported() {
    let mut query = create_query();
    let err = query.where_(json!(["resembles", "email", "test"])).unwrap_err();
    assert!(matches!(err, QueryError::MalformedCondition(_)));
}

#[test]
fn test_nested_boolean_composition() {
    let mut query = create_query();
    query
        .where_(json!([
            "and",
            ["or", {"username": "admin"}, {"username": "guest"}],
            ["not", ["<", "amount", 150]]
        ]))
        .unwrap();
    let rows = query.all().unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["username"], "guest");
}
