//! Field value types carried by list records

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A polymorphic field value that can hold different scalar types
///
/// Payloads are expected to carry scalars only. Nested arrays or objects are
/// kept as [`FieldValue::Composite`] so a single odd field never fails a whole
/// fetch; they never take part in filtering or search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
    Composite(serde_json::Value),
}

impl FieldValue {
    /// Get the value as a string if possible
    pub fn as_string(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if possible
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get the value as a boolean if possible
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view of integers and floats
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Canonical text of a scalar, as it would appear in a URL query
    ///
    /// Returns `None` for null and composite values.
    pub fn as_query_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::Null | FieldValue::Composite(_) => None,
        }
    }

    /// Ordering used when sorting a list by this field
    ///
    /// Strings compare case-insensitively, numbers numerically, booleans
    /// false-first. Values of different kinds order as
    /// numbers < strings < booleans < null/composite.
    pub fn sort_cmp(&self, other: &FieldValue) -> Ordering {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => a.cmp(b),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => self.kind_rank().cmp(&other.kind_rank()),
            },
        }
    }

    fn kind_rank(&self) -> u8 {
        match self {
            FieldValue::Integer(_) | FieldValue::Float(_) => 0,
            FieldValue::String(_) => 1,
            FieldValue::Boolean(_) => 2,
            FieldValue::Null | FieldValue::Composite(_) => 3,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Composite(v) => write!(f, "{}", v),
            scalar => write!(f, "{}", scalar.as_query_text().unwrap_or_default()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(i64::from(value))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_value_string() {
        let value = FieldValue::String("test".to_string());
        assert_eq!(value.as_string(), Some("test"));
        assert_eq!(value.as_integer(), None);
        assert!(!value.is_null());
    }

    #[test]
    fn test_field_value_integer() {
        let value = FieldValue::Integer(42);
        assert_eq!(value.as_integer(), Some(42));
        assert_eq!(value.as_string(), None);
        assert_eq!(value.as_f64(), Some(42.0));
    }

    #[test]
    fn test_field_value_null() {
        let value = FieldValue::Null;
        assert!(value.is_null());
        assert_eq!(value.as_string(), None);
        assert_eq!(value.as_query_text(), None);
    }

    #[test]
    fn test_deserialize_picks_scalar_variants() {
        let values: Vec<FieldValue> =
            serde_json::from_value(json!(["vol-1", 7, 1.5, true, null, {"k": "v"}])).unwrap();

        assert_eq!(values[0], FieldValue::String("vol-1".to_string()));
        assert_eq!(values[1], FieldValue::Integer(7));
        assert_eq!(values[2], FieldValue::Float(1.5));
        assert_eq!(values[3], FieldValue::Boolean(true));
        assert_eq!(values[4], FieldValue::Null);
        assert!(matches!(values[5], FieldValue::Composite(_)));
    }

    #[test]
    fn test_query_text_of_scalars() {
        assert_eq!(FieldValue::Integer(2).as_query_text().as_deref(), Some("2"));
        assert_eq!(FieldValue::Boolean(true).as_query_text().as_deref(), Some("true"));
        assert_eq!(FieldValue::from("x").as_query_text().as_deref(), Some("x"));
        assert_eq!(FieldValue::Composite(json!([1])).as_query_text(), None);
    }

    #[test]
    fn test_sort_cmp_strings_ignore_case() {
        let a = FieldValue::from("alpha");
        let b = FieldValue::from("Beta");
        assert_eq!(a.sort_cmp(&b), Ordering::Less);
        assert_eq!(b.sort_cmp(&a), Ordering::Greater);
    }

    #[test]
    fn test_sort_cmp_mixed_numbers() {
        let a = FieldValue::Integer(10);
        let b = FieldValue::Float(2.5);
        assert_eq!(a.sort_cmp(&b), Ordering::Greater);
    }

    #[test]
    fn test_sort_cmp_kinds() {
        assert_eq!(
            FieldValue::Integer(1).sort_cmp(&FieldValue::from("a")),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Null.sort_cmp(&FieldValue::Boolean(false)),
            Ordering::Greater
        );
    }
}
