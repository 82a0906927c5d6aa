//! # Landing
//!
//! Resource list management for the landing pages of a cloud console
//! (volumes, images, instances, scaling groups, ...).
//!
//! ## Features
//!
//! - **Filter Engine**: URL parameter "all match" filters and free-text search
//! - **Persisted View State**: sort key, direction and table/grid view per resource
//! - **Polling Refresh**: re-fetch while records are in a transitional state
//! - **Pluggable Backends**: preferences in memory, in a JSON file or in LMDB
//! - **Typed Errors**: session expiry, HTTP and transport failures kept apart
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use landing::prelude::*;
//!
//! let config = ConsoleConfig::default_config();
//! let volumes = config.resource("volumes")?.clone();
//!
//! let mut page = LandingPage::open(
//!     volumes,
//!     Arc::new(InMemoryRecordSource::new(records)),
//!     Arc::new(InMemoryKeyValueStore::new()),
//!     EventBus::default(),
//!     QueryParams::parse("zone=us-east-1a&filter=1"),
//! );
//!
//! page.load().await?;          // polls every 5s while volumes attach/detach
//! page.set_sort_key("size")?;  // persisted as "volumes-sortBy"
//! let rows = page.search("db");
//! page.close();
//! ```

pub mod client;
pub mod config;
pub mod core;
pub mod list;
pub mod page;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, FetchError, ListError, ListResult, StorageError, ViewStateError},
        events::{EventBus, EventEnvelope, ListEvent},
        field::FieldValue,
        filter::{apply_param_filters, search_filter},
        format::{ellipsis, escape_url},
        query::{FilterSpec, QueryParams},
        record::{ListPayload, Record, TransitionalRule},
        service::RecordSource,
        store::KeyValueStore,
        view_state::{Preference, ViewMode, ViewState, ViewStateStore},
    };

    // === List ===
    pub use crate::list::{FetchSummary, PollHandle, PollPolicy, PollState, ResourceList};
    pub use crate::page::LandingPage;

    // === Storage ===
    pub use crate::storage::{InMemoryKeyValueStore, InMemoryRecordSource, JsonFileStore};
    #[cfg(feature = "lmdb")]
    pub use crate::storage::LmdbKeyValueStore;

    // === Client ===
    #[cfg(feature = "http")]
    pub use crate::client::HttpRecordSource;

    // === Config ===
    pub use crate::config::{ConsoleConfig, ResourceConfig};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}
