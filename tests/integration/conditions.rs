#![allow(missing_docs)]

//! Query-string filtering end to end: parameters in, matched records out.

use alacena::query::condition::ConditionTree;
use alacena::query::op::Operator;
use alacena::query::parse::parse_conditions;
use serde_json::{json, Value};

fn pairs(raw: &str) -> Vec<(String, String)> {
    raw.split('&')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| {
            let (key, value) = chunk.split_once('=').unwrap_or((chunk, ""));
            (key.to_owned(), value.to_owned())
        })
        .collect()
}

fn matching_ids(records: &[Value], query: &str) -> Vec<String> {
    let tree = parse_conditions(&pairs(query));
    records
        .iter()
        .filter(|record| tree.matches(record))
        .map(|record| record["id"].as_str().expect("string id").to_owned())
        .collect()
}

fn posts() -> Vec<Value> {
    vec![
        json!({"id": "1", "views": 100, "author": {"name": "ada", "id": 1}}),
        json!({"id": "2", "views": 200, "author": {"name": "bob", "id": 2}}),
        json!({"id": "3", "views": 300, "author": {"name": "cyd", "id": 3}}),
    ]
}

#[test]
fn greater_than_filters_strictly() {
    assert_eq!(matching_ids(&posts(), "views:gt=100"), ["2", "3"]);
}

#[test]
fn legacy_and_colon_forms_agree() {
    assert_eq!(
        matching_ids(&posts(), "views_gte=200"),
        matching_ids(&posts(), "views:gte=200")
    );
}

#[test]
fn unknown_operator_contributes_nothing() {
    let tree = parse_conditions(&pairs("views:foo=100"));
    assert!(tree.is_empty());
    // And therefore everything matches.
    assert_eq!(matching_ids(&posts(), "views:foo=100"), ["1", "2", "3"]);
}

#[test]
fn nested_paths_build_the_documented_tree() {
    let parsed = parse_conditions(&pairs("author.name:lt=c&author.id:ne=2"));

    let mut expected = ConditionTree::new();
    expected.assign("author.name", Operator::Lt, json!("c"));
    expected.assign("author.id", Operator::Ne, json!(2));
    assert_eq!(parsed, expected);

    assert_eq!(
        matching_ids(&posts(), "author.name:lt=c&author.id:ne=2"),
        ["1"]
    );
}

#[test]
fn in_list_selects_members() {
    assert_eq!(matching_ids(&posts(), "id:in=1,3"), ["1", "3"]);
    assert_eq!(matching_ids(&posts(), "views:in=200"), ["2"]);
}

#[test]
fn operators_on_one_field_are_a_conjunction() {
    assert_eq!(matching_ids(&posts(), "views:gte=100&views:lt=300"), ["1", "2"]);
}

#[test]
fn where_overrides_other_parameters() {
    let query = r#"views=100&_where={"or":[{"views":{"eq":200}},{"views":{"eq":300}}]}"#;
    assert_eq!(matching_ids(&posts(), query), ["2", "3"]);
}

#[test]
fn broken_where_keeps_parameter_filters() {
    assert_eq!(matching_ids(&posts(), "views=100&_where=[broken"), ["1"]);
}

#[test]
fn coerced_booleans_and_null_filter_exactly() {
    let records = vec![
        json!({"id": "1", "draft": true, "deletedAt": null}),
        json!({"id": "2", "draft": false, "deletedAt": "2024-01-01"}),
    ];
    assert_eq!(matching_ids(&records, "draft=true"), ["1"]);
    assert_eq!(matching_ids(&records, "deletedAt=null"), ["1"]);
    assert_eq!(matching_ids(&records, "deletedAt:ne=null"), ["2"]);
}

#[test]
fn cross_kind_range_comparisons_never_match() {
    // The views field is a string here; a numeric bound has no defined
    // order against it and the operator fails rather than guessing.
    let records = vec![json!({"id": "1", "views": "150"})];
    assert_eq!(matching_ids(&records, "views:gt=100"), Vec::<String>::new());
    assert_eq!(matching_ids(&records, "views:lt=999"), Vec::<String>::new());
    // Equality is just as strict about kinds: "150" is not 150.
    assert_eq!(matching_ids(&records, "views=150"), Vec::<String>::new());
}
