//! List records and the payload shape returned by record sources

use crate::core::field::FieldValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single row of a landing page list
///
/// Records are opaque field maps supplied wholesale by the data source. Field
/// order of the payload is preserved. The list manager never mutates a record
/// after it has been fetched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Record(IndexMap<String, FieldValue>);

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Builder-style field insertion
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Get a field value
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    /// Get a field only if it holds a string
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(FieldValue::as_string)
    }

    /// Whether the record owns the field at all
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Iterate over `(field, value)` pairs in payload order
    pub fn fields(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a record from a JSON object
    ///
    /// Returns `None` when the value is not an object.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Object(_) => serde_json::from_value(value).ok(),
            _ => None,
        }
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rule deciding which records are in a transitional state
///
/// A record is transitional when its boolean `transitional` flag is set or
/// when its `status` is one of the configured transitional statuses.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionalRule {
    statuses: HashSet<String>,
}

impl TransitionalRule {
    pub const FLAG_FIELD: &'static str = "transitional";
    pub const STATUS_FIELD: &'static str = "status";

    /// Create a rule from a set of status values
    pub fn new<I, S>(statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            statuses: statuses.into_iter().map(Into::into).collect(),
        }
    }

    /// A rule that only honours the `transitional` flag
    pub fn flag_only() -> Self {
        Self::default()
    }

    pub fn is_transitional(&self, record: &Record) -> bool {
        if record
            .get(Self::FLAG_FIELD)
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
        {
            return true;
        }
        record
            .get_str(Self::STATUS_FIELD)
            .is_some_and(|status| self.statuses.contains(status))
    }

    /// Count the transitional records in a slice
    pub fn count(&self, records: &[Record]) -> usize {
        records.iter().filter(|r| self.is_transitional(r)).count()
    }
}

/// Success payload of a list endpoint
///
/// `{ "results": [...] }`. A missing or null `results` key is an empty list,
/// not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ListPayload {
    #[serde(default)]
    pub results: Option<Vec<Record>>,
}

impl ListPayload {
    pub fn new(results: Vec<Record>) -> Self {
        Self {
            results: Some(results),
        }
    }

    /// Decode a response body; a `null` body is an empty list
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        serde_json::from_value(value)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.results.unwrap_or_default()
    }
}
