//! Integration tests for URL parameter filters and free-text search

use landing::prelude::*;
use serde_json::json;

fn records(value: serde_json::Value) -> Vec<Record> {
    serde_json::from_value(value).expect("fixture should decode")
}

fn fields(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn volumes() -> Vec<Record> {
    records(json!([
        {"id": "vol-0a1", "name": "Database", "zone": "us-east-1a", "status": "in-use", "size": 100},
        {"id": "vol-0b2", "name": "logs", "zone": "us-east-1b", "status": "available", "size": 20},
        {"id": "vol-0c3", "name": "scratch", "zone": "us-east-1a", "status": "available"},
        {"id": "vol-0d4", "zone": "us-west-2a", "status": "attaching", "transitional": true},
        {"id": "vol-0e5", "name": "BACKUP data", "zone": "us-west-2a", "status": "error"}
    ]))
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn test_empty_search_is_identity_on_unfiltered() {
    let unfiltered = volumes();
    let displayed = unfiltered[..2].to_vec();

    for search_fields in [fields(&["name"]), fields(&["id", "zone"]), fields(&[])] {
        let result = search_filter(&displayed, &unfiltered, "", &search_fields);
        assert_eq!(result, unfiltered);
    }
}

#[test]
fn test_search_result_is_exactly_the_matching_records() {
    let unfiltered = volumes();
    let search_fields = fields(&["name", "id", "status"]);

    for text in ["DATA", "vol-0", "avail", "e", "nothing-like-this", "Us-East"] {
        let needle = text.to_lowercase();
        let result = search_filter(&[], &unfiltered, text, &search_fields);

        let expected: Vec<Record> = unfiltered
            .iter()
            .filter(|r| {
                search_fields.iter().any(|f| {
                    r.get_str(f)
                        .is_some_and(|v| v.to_lowercase().contains(&needle))
                })
            })
            .cloned()
            .collect();

        assert_eq!(result, expected, "search text {:?}", text);
    }
}

#[test]
fn test_search_field_order_does_not_change_result() {
    let unfiltered = volumes();
    let forward = search_filter(&[], &unfiltered, "a", &fields(&["name", "zone"]));
    let backward = search_filter(&[], &unfiltered, "a", &fields(&["zone", "name"]));
    assert_eq!(forward, backward);
}

#[test]
fn test_search_never_coerces_numbers() {
    let unfiltered = volumes();
    let result = search_filter(&[], &unfiltered, "100", &fields(&["size"]));
    assert!(result.is_empty());
}

#[test]
fn test_search_does_not_mutate_inputs() {
    let unfiltered = volumes();
    let snapshot = unfiltered.clone();
    let _ = search_filter(&[], &unfiltered, "logs", &fields(&["name"]));
    assert_eq!(unfiltered, snapshot);
}

// =============================================================================
// URL parameter filters
// =============================================================================

#[test]
fn test_zone_filter_scenario() {
    let items = records(json!([
        {"id": 1, "zone": "us-east-1"},
        {"id": 2, "zone": "us-west-1"}
    ]));
    let query = QueryParams::new().with("zone", "us-east-1").with("filter", "1");

    let result = apply_param_filters(&items, &query);
    assert_eq!(result, records(json!([{"id": 1, "zone": "us-east-1"}])));
}

#[test]
fn test_param_filters_are_idempotent() {
    let items = volumes();
    let queries = [
        QueryParams::parse("zone=us-east-1a&filter=1"),
        QueryParams::parse("status=available&status=error"),
        QueryParams::parse("zone=us-west-2a&status=attaching"),
        QueryParams::parse("display=gridview"),
        QueryParams::parse("size=20"),
    ];

    for query in &queries {
        let once = apply_param_filters(&items, query);
        let twice = apply_param_filters(&once, query);
        assert_eq!(once, twice, "query {:?}", query);
    }
}

#[test]
fn test_reserved_and_empty_keys_ignored() {
    let items = volumes();
    let query = QueryParams::parse("filter=1&display=tableview&zone=&status=");
    assert_eq!(apply_param_filters(&items, &query), items);
}

#[test]
fn test_and_across_fields_or_within_field() {
    let items = volumes();
    let query = QueryParams::parse("zone=us-east-1a&zone=us-west-2a&status=available&status=error");

    let result = apply_param_filters(&items, &query);
    let ids: Vec<&str> = result.iter().filter_map(|r| r.get_str("id")).collect();
    assert_eq!(ids, ["vol-0c3", "vol-0e5"]);
}

#[test]
fn test_no_match_is_empty_not_error() {
    let items = volumes();
    let query = QueryParams::parse("zone=eu-central-1a");
    assert!(apply_param_filters(&items, &query).is_empty());
}

#[test]
fn test_filter_spec_can_be_built_by_hand() {
    let items = volumes();
    let spec = FilterSpec::default()
        .accept("status", "available")
        .accept("zone", "us-east-1b");
    let result = landing::core::apply_filter_spec(&items, &spec);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].get_str("name"), Some("logs"));
}

// =============================================================================
// Display helpers
// =============================================================================

#[test]
fn test_display_helpers() {
    assert_eq!(ellipsis("snapshot-of-production-database", 8), "snapshot...");
    assert_eq!(escape_url("tag:Name=web 1"), "tag%3AName%3Dweb%201");
}
