//! Persisted sort and view preferences of one landing page
//!
//! Preferences live in a [`KeyValueStore`] under resource-scoped keys:
//!
//! | key                           | value                    |
//! |-------------------------------|--------------------------|
//! | `<resource>-sortBy`           | sort field name          |
//! | `<resource>-sortReverse`      | `"true"` / `"false"`     |
//! | `<resource>-landingPageView`  | `"tableview"` / `"gridview"` |
//!
//! so the volumes list and the images list never clobber each other.

use crate::core::error::{ListResult, ViewStateError};
use crate::core::events::{EventBus, ListEvent};
use crate::core::query::QueryParams;
use crate::core::record::Record;
use crate::core::store::{KeyValueStore, scoped_key};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub const SORT_BY_KEY: &str = "sortBy";
pub const SORT_REVERSE_KEY: &str = "sortReverse";
pub const VIEW_MODE_KEY: &str = "landingPageView";

/// Layout of a landing page list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Table,
    Grid,
}

impl ViewMode {
    /// Value written to the preference store
    pub fn storage_value(&self) -> &'static str {
        match self {
            ViewMode::Table => "tableview",
            ViewMode::Grid => "gridview",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Table => "table",
            ViewMode::Grid => "grid",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts `table` / `grid` and the stored spellings `tableview` / `gridview`
impl FromStr for ViewMode {
    type Err = ViewStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "table" | "tableview" => Ok(ViewMode::Table),
            "grid" | "gridview" => Ok(ViewMode::Grid),
            other => Err(ViewStateError::InvalidViewMode {
                value: other.to_string(),
            }),
        }
    }
}

/// Current sort and layout of a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewState {
    pub sort_key: String,
    pub sort_reverse: bool,
    pub view_mode: ViewMode,
}

impl ViewState {
    /// Read the persisted state of `resource`
    ///
    /// Falls back to `default_sort_key`, `false` and table view for each
    /// value that is absent, empty, malformed or unreadable. Only the literal
    /// `"true"` turns reverse sorting on.
    pub fn load(store: &dyn KeyValueStore, resource: &str, default_sort_key: &str) -> Self {
        let read = |name: &str| -> Option<String> {
            let key = scoped_key(resource, name);
            match store.get(&key) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(resource = %resource, key = %key, error = %e, "Failed to read view preference");
                    None
                }
            }
        };

        let sort_key = read(SORT_BY_KEY)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| default_sort_key.to_string());
        let sort_reverse = read(SORT_REVERSE_KEY).is_some_and(|s| s == "true");
        let view_mode = read(VIEW_MODE_KEY)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        Self {
            sort_key,
            sort_reverse,
            view_mode,
        }
    }

    /// Order records by the current sort key and direction
    ///
    /// The sort is stable. Records lacking the sort field go last whatever
    /// the direction.
    pub fn sort_records(&self, records: &[Record]) -> Vec<Record> {
        let mut sorted = records.to_vec();
        sorted.sort_by(|a, b| {
            match (a.get(&self.sort_key), b.get(&self.sort_key)) {
                (Some(x), Some(y)) => {
                    let ord = x.sort_cmp(y);
                    if self.sort_reverse { ord.reverse() } else { ord }
                }
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        sorted
    }
}

/// Sort/view state of one resource, persisted on every change
///
/// # Example
///
/// ```rust,ignore
/// let mut view = ViewStateStore::initialize("volumes", "name", store, events);
/// view.set_sort_key("create_time")?;
/// view.toggle_sort_reverse()?;
/// view.set_view_mode(ViewMode::Grid)?;
/// ```
pub struct ViewStateStore {
    resource: String,
    store: Arc<dyn KeyValueStore>,
    events: EventBus,
    state: ViewState,
}

impl ViewStateStore {
    /// Load the persisted state of `resource`, see [`ViewState::load`]
    pub fn initialize(
        resource: impl Into<String>,
        default_sort_key: &str,
        store: Arc<dyn KeyValueStore>,
        events: EventBus,
    ) -> Self {
        let resource = resource.into();
        let state = ViewState::load(store.as_ref(), &resource, default_sort_key);
        tracing::debug!(
            resource = %resource,
            sort_key = %state.sort_key,
            sort_reverse = state.sort_reverse,
            view_mode = %state.view_mode,
            "View state initialized"
        );
        Self {
            resource,
            store,
            events,
            state,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Change the sort key, persist it and dismiss any open sort menu
    pub fn set_sort_key(&mut self, key: impl Into<String>) -> ListResult<()> {
        self.state.sort_key = key.into();
        self.events.publish(ListEvent::SortMenuDismissed {
            resource: self.resource.clone(),
        });
        self.events.publish(ListEvent::SortChanged {
            resource: self.resource.clone(),
            sort_key: self.state.sort_key.clone(),
        });
        self.persist(SORT_BY_KEY, &self.state.sort_key)
    }

    /// Flip the sort direction and persist it; returns the new direction
    pub fn toggle_sort_reverse(&mut self) -> ListResult<bool> {
        self.state.sort_reverse = !self.state.sort_reverse;
        self.events.publish(ListEvent::SortDirectionChanged {
            resource: self.resource.clone(),
            reverse: self.state.sort_reverse,
        });
        let value = if self.state.sort_reverse { "true" } else { "false" };
        self.persist(SORT_REVERSE_KEY, value)?;
        Ok(self.state.sort_reverse)
    }

    /// Switch between table and grid view and persist it
    pub fn set_view_mode(&mut self, mode: ViewMode) -> ListResult<()> {
        self.state.view_mode = mode;
        self.events.publish(ListEvent::ViewModeChanged {
            resource: self.resource.clone(),
            mode,
        });
        self.persist(VIEW_MODE_KEY, mode.storage_value())
    }

    /// String form of [`Self::set_view_mode`]; only `table` and `grid` pass
    pub fn set_view_mode_str(&mut self, mode: &str) -> ListResult<()> {
        let mode = match mode {
            "table" => ViewMode::Table,
            "grid" => ViewMode::Grid,
            other => {
                return Err(ViewStateError::InvalidViewMode {
                    value: other.to_string(),
                }
                .into());
            }
        };
        self.set_view_mode(mode)
    }

    /// Honour a `display` URL parameter for this page load only
    ///
    /// The override is not persisted. Returns whether a mode was applied.
    pub fn apply_display_override(&mut self, query: &QueryParams) -> bool {
        match query.display() {
            Some(mode) => {
                self.state.view_mode = mode;
                true
            }
            None => false,
        }
    }

    /// Order records by the current state, see [`ViewState::sort_records`]
    pub fn sort_records(&self, records: &[Record]) -> Vec<Record> {
        self.state.sort_records(records)
    }

    fn persist(&self, name: &str, value: &str) -> ListResult<()> {
        self.store
            .set(&scoped_key(&self.resource, name), value)
            .map_err(|e| {
                tracing::warn!(resource = %self.resource, name = %name, error = %e, "Failed to persist view preference");
                e.into()
            })
    }
}

/// A single persisted preference outside of list view state
///
/// The dashboard keeps its selected availability zone this way under
/// `dashboard_availability_zone`.
#[derive(Clone)]
pub struct Preference {
    key: String,
    store: Arc<dyn KeyValueStore>,
}

impl Preference {
    pub const DASHBOARD_ZONE: &'static str = "dashboard_availability_zone";

    pub fn new(key: impl Into<String>, store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            key: key.into(),
            store,
        }
    }

    /// Stored value, empty string when unset or unreadable
    pub fn get(&self) -> String {
        match self.store.get(&self.key) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read preference");
                String::new()
            }
        }
    }

    pub fn set(&self, value: &str) -> ListResult<()> {
        Ok(self.store.set(&self.key, value)?)
    }
}
