//! Landing page view model
//!
//! Ties a [`ResourceList`] to the persisted [`ViewStateStore`] of the same
//! resource. The hosting UI binds to this object and subscribes to the
//! [`EventBus`]; the page itself holds no framework state.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ConsoleConfig::default_config();
//! let page = LandingPage::open(
//!     config.resource("volumes")?.clone(),
//!     Arc::new(HttpRecordSource::for_resource(client, base_url, volumes)),
//!     Arc::new(JsonFileStore::open("prefs.json")?),
//!     EventBus::default(),
//!     QueryParams::parse(query_string),
//! );
//! page.load().await?;
//! for row in page.rows() { /* render */ }
//! page.close();
//! ```

use crate::config::ResourceConfig;
use crate::core::error::ListResult;
use crate::core::events::EventBus;
use crate::core::query::QueryParams;
use crate::core::record::Record;
use crate::core::service::RecordSource;
use crate::core::store::KeyValueStore;
use crate::core::view_state::{ViewMode, ViewState, ViewStateStore};
use crate::list::{FetchSummary, ResourceList};
use std::sync::Arc;

/// One open landing page
pub struct LandingPage {
    list: Arc<ResourceList>,
    view: ViewStateStore,
    events: EventBus,
}

impl LandingPage {
    /// Set up the page: restore preferences, honour `display`, build the list
    ///
    /// Nothing is fetched until [`Self::load`].
    pub fn open(
        config: ResourceConfig,
        source: Arc<dyn RecordSource>,
        store: Arc<dyn KeyValueStore>,
        events: EventBus,
        query: QueryParams,
    ) -> Self {
        let mut view = ViewStateStore::initialize(
            config.key.clone(),
            &config.default_sort,
            store,
            events.clone(),
        );
        view.apply_display_override(&query);

        tracing::debug!(resource = %config.key, "Landing page opened");
        let list = ResourceList::new(config, source, events.clone(), query);
        Self { list, view, events }
    }

    /// Fetch the records, starting auto-refresh if any are transitional
    pub async fn load(&self) -> ListResult<FetchSummary> {
        self.list.refresh().await
    }

    pub fn list(&self) -> &Arc<ResourceList> {
        &self.list
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn view_state(&self) -> &ViewState {
        self.view.state()
    }

    /// Displayed records in the current sort order
    pub fn rows(&self) -> Vec<Record> {
        self.view.sort_records(&self.list.items())
    }

    /// Free-text search, returns the rows in sort order
    pub fn search(&self, text: &str) -> Vec<Record> {
        self.view.sort_records(&self.list.search(text))
    }

    pub fn set_sort_key(&mut self, key: impl Into<String>) -> ListResult<()> {
        self.view.set_sort_key(key)
    }

    pub fn toggle_sort_reverse(&mut self) -> ListResult<bool> {
        self.view.toggle_sort_reverse()
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) -> ListResult<()> {
        self.view.set_view_mode(mode)
    }

    /// Tear the page down; no fetch happens after this returns
    pub fn close(&self) {
        tracing::debug!(resource = %self.list.resource(), "Landing page closed");
        self.list.cancel_polling();
    }
}

impl Drop for LandingPage {
    fn drop(&mut self) {
        self.list.cancel_polling();
    }
}
