//! Landing page query parameters and the filter spec derived from them

use crate::core::view_state::ViewMode;
use indexmap::IndexMap;

/// Reserved key whose presence turns URL filtering on
pub const FILTER_FLAG_KEY: &str = "filter";

/// Reserved key carrying the initial view mode (`tableview` | `gridview`)
pub const DISPLAY_KEY: &str = "display";

/// Query parameters of a landing page URL
///
/// Kept as ordered `(key, value)` pairs so repeated keys survive
/// (`?status=available&status=in-use`).
///
/// # Example
/// ```rust,ignore
/// let params = QueryParams::parse("zone=us-east-1&filter=1&display=gridview");
/// assert!(params.filter_requested());
/// assert_eq!(params.display(), Some(ViewMode::Grid));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw query string (with or without the leading `?`)
    ///
    /// Keys and values are percent-decoded and `+` is read as a space.
    /// Pairs that fail to decode are skipped.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = query
            .split('&')
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                let (key, value) = part.split_once('=').unwrap_or((part, ""));
                Some((decode_component(key)?, decode_component(value)?))
            })
            .collect();
        Self { pairs }
    }

    /// Builder-style insertion
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// First value of a key, compared case-insensitively
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the page asked for URL filters to be applied
    ///
    /// The `filter` key acts as a flag: it must be present with a non-empty
    /// value.
    pub fn filter_requested(&self) -> bool {
        self.get(FILTER_FLAG_KEY).is_some_and(|v| !v.is_empty())
    }

    /// View mode requested through the `display` key, if any
    pub fn display(&self) -> Option<ViewMode> {
        self.get(DISPLAY_KEY).and_then(|v| v.parse().ok())
    }

    /// Build the filter spec from every non-reserved key
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec::from_pairs(self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn decode_component(raw: &str) -> Option<String> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).ok().map(|s| s.into_owned())
}

/// Field constraints derived from query parameters
///
/// AND across fields, OR within the accepted values of one field. Field
/// names are lower-cased when grouped, so `Zone=a&zone=b` accepts either
/// value for the `zone` field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    clauses: IndexMap<String, Vec<String>>,
}

impl FilterSpec {
    /// Whether a key is reserved and never used as a field filter
    pub fn is_reserved(key: &str) -> bool {
        key.eq_ignore_ascii_case(FILTER_FLAG_KEY) || key.eq_ignore_ascii_case(DISPLAY_KEY)
    }

    /// Group `(key, value)` pairs into clauses
    ///
    /// Reserved keys are skipped. Empty values never become accepted values,
    /// and a field whose values are all empty yields no clause.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut clauses: IndexMap<String, Vec<String>> = IndexMap::new();
        for (key, value) in pairs {
            if Self::is_reserved(key) || value.is_empty() {
                continue;
            }
            let accepted = clauses.entry(key.to_lowercase()).or_default();
            if !accepted.iter().any(|v| v == value) {
                accepted.push(value.to_string());
            }
        }
        Self { clauses }
    }

    /// Add one accepted value for a field
    pub fn accept(mut self, field: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if !Self::is_reserved(field) && !value.is_empty() {
            self.clauses
                .entry(field.to_lowercase())
                .or_default()
                .push(value);
        }
        self
    }

    /// Iterate over `(field, accepted values)` clauses
    pub fn clauses(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.clauses.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }
}
