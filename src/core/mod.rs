//! Core module containing the list manager's fundamental traits and types

pub mod error;
pub mod events;
pub mod field;
pub mod filter;
pub mod format;
pub mod query;
pub mod record;
pub mod service;
pub mod store;
pub mod view_state;

pub use error::{ConfigError, FetchError, ListError, ListResult, StorageError, ViewStateError};
pub use events::{EventBus, EventEnvelope, ListEvent};
pub use field::FieldValue;
pub use filter::{apply_filter_spec, apply_param_filters, search_filter};
pub use query::{FilterSpec, QueryParams};
pub use record::{ListPayload, Record, TransitionalRule};
pub use service::RecordSource;
pub use store::KeyValueStore;
pub use view_state::{Preference, ViewMode, ViewState, ViewStateStore};
