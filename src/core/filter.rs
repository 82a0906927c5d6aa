//! Client-side list filtering
//!
//! Two independent passes are offered:
//!
//! - [`apply_param_filters`]: "all match" of URL parameter constraints
//! - [`search_filter`]: free-text "any match" over a list of fields
//!
//! Neither function mutates its inputs. Both return a fresh list, except
//! that an empty search returns the unfiltered list itself.

use crate::core::query::{FilterSpec, QueryParams};
use crate::core::record::Record;

/// Keep the records matching every non-empty URL parameter filter
///
/// Reserved keys (`filter`, `display`) and empty values are ignored. With no
/// clause left every record is kept. Applying the same params twice yields
/// the same result as applying them once.
pub fn apply_param_filters(records: &[Record], query: &QueryParams) -> Vec<Record> {
    apply_filter_spec(records, &query.filter_spec())
}

/// Keep the records matching a prepared filter spec
pub fn apply_filter_spec(records: &[Record], spec: &FilterSpec) -> Vec<Record> {
    if spec.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| matches_spec(record, spec))
        .cloned()
        .collect()
}

/// Whether a record satisfies every clause of a filter spec
pub fn matches_spec(record: &Record, spec: &FilterSpec) -> bool {
    spec.clauses().all(|(field, accepted)| {
        field_text(record, field)
            .is_some_and(|value| accepted.iter().any(|candidate| *candidate == value))
    })
}

// Clause fields are lower-cased; record fields keep their payload casing.
fn field_text(record: &Record, field: &str) -> Option<String> {
    let value = record.get(field).or_else(|| {
        record
            .fields()
            .find(|(name, _)| name.to_lowercase() == field)
            .map(|(_, value)| value)
    })?;
    value.as_query_text()
}

/// Free-text search over the unfiltered records
///
/// `_records` is the currently displayed list; it is accepted so call sites
/// read like the view they refresh, but the search always starts from
/// `unfiltered`. The text is lower-cased; an empty text returns `unfiltered`
/// unchanged. Otherwise a record is kept when any of `fields` holds a string
/// whose lower-cased value contains the text. Non-string values are never
/// coerced and missing fields never match.
pub fn search_filter(
    _records: &[Record],
    unfiltered: &[Record],
    search_text: &str,
    fields: &[String],
) -> Vec<Record> {
    let needle = search_text.to_lowercase();
    if needle.is_empty() {
        return unfiltered.to_vec();
    }
    unfiltered
        .iter()
        .filter(|record| matches_search(record, &needle, fields))
        .cloned()
        .collect()
}

/// Whether a record matches an already lower-cased search text
pub fn matches_search(record: &Record, needle: &str, fields: &[String]) -> bool {
    fields.iter().any(|field| {
        record
            .get_str(field)
            .is_some_and(|value| value.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        serde_json::from_value(value).unwrap()
    }

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_param_filter_zone() {
        let items = records(json!([
            {"id": 1, "zone": "us-east-1"},
            {"id": 2, "zone": "us-west-1"}
        ]));
        let query = QueryParams::new().with("zone", "us-east-1").with("filter", "1");

        let result = apply_param_filters(&items, &query);
        assert_eq!(result, records(json!([{"id": 1, "zone": "us-east-1"}])));
    }

    #[test]
    fn test_param_filter_no_clauses_keeps_all() {
        let items = records(json!([{"id": 1}, {"id": 2}]));
        let query = QueryParams::new().with("filter", "1").with("display", "gridview");
        assert_eq!(apply_param_filters(&items, &query).len(), 2);
    }

    #[test]
    fn test_param_filter_and_across_fields() {
        let items = records(json!([
            {"id": 1, "zone": "a", "status": "available"},
            {"id": 2, "zone": "a", "status": "in-use"},
            {"id": 3, "zone": "b", "status": "available"}
        ]));
        let query = QueryParams::new().with("zone", "a").with("status", "available");
        let result = apply_param_filters(&items, &query);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get("id"), Some(&1.into()));
    }

    #[test]
    fn test_param_filter_or_within_field() {
        let items = records(json!([
            {"id": 1, "status": "available"},
            {"id": 2, "status": "in-use"},
            {"id": 3, "status": "error"}
        ]));
        let query = QueryParams::parse("status=available&status=in-use");
        assert_eq!(apply_param_filters(&items, &query).len(), 2);
    }

    #[test]
    fn test_param_filter_missing_field_is_non_match() {
        let items = records(json!([{"id": 1}, {"id": 2, "zone": "a"}]));
        let query = QueryParams::new().with("zone", "a");
        assert_eq!(apply_param_filters(&items, &query).len(), 1);
    }

    #[test]
    fn test_param_filter_matches_scalar_text() {
        let items = records(json!([
            {"id": 1, "encrypted": true, "size": 10},
            {"id": 2, "encrypted": false, "size": 20}
        ]));
        let query = QueryParams::new().with("encrypted", "true");
        assert_eq!(apply_param_filters(&items, &query).len(), 1);

        let query = QueryParams::new().with("size", "20");
        assert_eq!(apply_param_filters(&items, &query).len(), 1);
    }

    #[test]
    fn test_param_filter_field_casing() {
        let items = records(json!([{"id": 1, "Zone": "a"}, {"id": 2, "Zone": "b"}]));
        let query = QueryParams::new().with("zone", "a");
        assert_eq!(apply_param_filters(&items, &query).len(), 1);
    }

    #[test]
    fn test_search_empty_returns_unfiltered() {
        let unfiltered = records(json!([{"id": "a"}, {"id": "b"}]));
        let displayed = vec![unfiltered[0].clone()];
        let result = search_filter(&displayed, &unfiltered, "", &fields(&["id"]));
        assert_eq!(result, unfiltered);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let unfiltered = records(json!([
            {"id": "vol-1", "name": "Database Disk"},
            {"id": "vol-2", "name": "scratch"}
        ]));
        let result = search_filter(&[], &unfiltered, "DATABASE", &fields(&["id", "name"]));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_str("id"), Some("vol-1"));
    }

    #[test]
    fn test_search_restarts_from_unfiltered() {
        let unfiltered = records(json!([{"name": "alpha"}, {"name": "beta"}]));
        let narrowed = search_filter(&[], &unfiltered, "alp", &fields(&["name"]));
        assert_eq!(narrowed.len(), 1);

        let widened = search_filter(&narrowed, &unfiltered, "a", &fields(&["name"]));
        assert_eq!(widened.len(), 2);
    }

    #[test]
    fn test_search_ignores_non_strings() {
        let unfiltered = records(json!([{"size": 100}, {"size": "100"}]));
        let result = search_filter(&[], &unfiltered, "100", &fields(&["size"]));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].get_str("size"), Some("100"));
    }

    #[test]
    fn test_search_unknown_fields_match_nothing() {
        let unfiltered = records(json!([{"name": "alpha"}]));
        let result = search_filter(&[], &unfiltered, "alpha", &fields(&["tags"]));
        assert!(result.is_empty());
    }
}
