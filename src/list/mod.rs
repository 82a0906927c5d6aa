//! Resource list: records of one landing page and their auto-refresh
//!
//! A [`ResourceList`] keeps two collections:
//!
//! - `unfiltered`: the last fetched record set, never narrowed
//! - `items`: what the page displays after URL filters and search
//!
//! Every filter or search recomputes `items` from `unfiltered`, so no user
//! action ever discards fetched data.
//!
//! # Polling
//!
//! ```text
//!            fetch ok, transitional > 0
//!   Idle ─────────────────────────────────▶ Polling ──┐
//!    ▲                                        │       │ fetch ok, transitional > 0
//!    └────────────────────────────────────────┘ ◀─────┘ (next fetch after interval)
//!      fetch ok with none left, session expired,
//!      retries exhausted, cancel()
//! ```
//!
//! At most one fetch is in flight per list: fetches are serialised by a
//! gate, and the follow-up fetch is scheduled only once its predecessor
//! has resolved.

pub mod poller;

pub use poller::{PollHandle, PollPolicy, PollState};

use crate::config::ResourceConfig;
use crate::core::error::{FetchError, ListError, ListResult};
use crate::core::events::{EventBus, ListEvent};
use crate::core::filter::{apply_param_filters, search_filter};
use crate::core::query::QueryParams;
use crate::core::record::{Record, TransitionalRule};
use crate::core::service::RecordSource;
use std::sync::{Arc, Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use std::time::Duration;

/// Outcome of one successful fetch
#[derive(Debug, Clone, PartialEq)]
pub struct FetchSummary {
    /// Records returned by the source
    pub total: usize,
    /// Records displayed after URL filters
    pub displayed: usize,
    /// Records in a transitional state
    pub transitional: usize,
    /// Delay of the follow-up fetch, `None` when the list goes idle
    pub next_poll: Option<Duration>,
}

#[derive(Debug, Default)]
struct ListState {
    items: Vec<Record>,
    unfiltered: Vec<Record>,
    search_text: String,
    loading: bool,
    poll_state: PollState,
    consecutive_failures: u32,
}

/// Records of one landing page
///
/// Shared as `Arc<ResourceList>`: the scheduled refresh task only holds a
/// weak reference, so dropping the last `Arc` ends polling.
pub struct ResourceList {
    config: ResourceConfig,
    source: Arc<dyn RecordSource>,
    events: EventBus,
    query: QueryParams,
    rule: TransitionalRule,
    policy: PollPolicy,
    state: RwLock<ListState>,
    fetch_gate: tokio::sync::Mutex<()>,
    poll: Mutex<Option<PollHandle>>,
}

impl ResourceList {
    /// Create a list for `config`, fed by `source`
    ///
    /// `query` holds the page URL parameters: field filters are applied after
    /// every fetch when the `filter` flag is present.
    pub fn new(
        config: ResourceConfig,
        source: Arc<dyn RecordSource>,
        events: EventBus,
        query: QueryParams,
    ) -> Arc<Self> {
        let rule = config.transitional_rule();
        let policy = PollPolicy::from_config(&config);
        Arc::new(Self {
            config,
            source,
            events,
            query,
            rule,
            policy,
            state: RwLock::new(ListState {
                loading: true,
                ..ListState::default()
            }),
            fetch_gate: tokio::sync::Mutex::new(()),
            poll: Mutex::new(None),
        })
    }

    pub fn resource(&self) -> &str {
        &self.config.key
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    // Readers recover from poisoning: the state is replaced wholesale, never
    // left half-updated.
    fn read(&self) -> RwLockReadGuard<'_, ListState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, ListState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Records currently displayed
    pub fn items(&self) -> Vec<Record> {
        self.read().items.clone()
    }

    /// Last fetched record set
    pub fn unfiltered(&self) -> Vec<Record> {
        self.read().unfiltered.clone()
    }

    /// True until the first fetch resolves
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    pub fn search_text(&self) -> String {
        self.read().search_text.clone()
    }

    pub fn poll_state(&self) -> PollState {
        self.read().poll_state
    }

    /// Transitional records in the last fetched set
    pub fn transitional_count(&self) -> usize {
        self.rule.count(&self.read().unfiltered)
    }

    /// Fetch the record set once, without scheduling anything
    ///
    /// On success both collections are replaced by the results, and URL
    /// filters are applied to the displayed set when the page asked for them.
    /// The caller decides about polling; see [`Self::refresh`].
    pub async fn fetch(&self) -> ListResult<FetchSummary> {
        let _gate = self.fetch_gate.lock().await;
        self.fetch_locked().await
    }

    async fn fetch_locked(&self) -> ListResult<FetchSummary> {
        tracing::debug!(resource = %self.config.key, source = %self.source.describe(), "Fetching records");

        let payload = match self.source.fetch().await {
            Ok(payload) => payload,
            Err(error) => {
                self.report_failure(&error);
                return Err(error.into());
            }
        };

        let results = payload.into_records();
        let transitional = self.rule.count(&results);
        let displayed = if self.query.filter_requested() {
            apply_param_filters(&results, &self.query)
        } else {
            results.clone()
        };

        let summary = FetchSummary {
            total: results.len(),
            displayed: displayed.len(),
            transitional,
            next_poll: self.policy.after_success(transitional),
        };

        {
            let mut state = self.write();
            state.unfiltered = results;
            state.items = displayed;
            state.search_text.clear();
            state.loading = false;
            state.consecutive_failures = 0;
        }

        tracing::debug!(
            resource = %self.config.key,
            total = summary.total,
            displayed = summary.displayed,
            transitional = summary.transitional,
            "Records loaded"
        );
        self.events.publish(ListEvent::ItemsLoaded {
            resource: self.config.key.clone(),
            total: summary.total,
            displayed: summary.displayed,
            transitional: summary.transitional,
        });

        Ok(summary)
    }

    fn report_failure(&self, error: &FetchError) {
        tracing::warn!(resource = %self.config.key, code = error.error_code(), error = %error, "Fetch failed");
        let event = match error {
            FetchError::SessionExpired { message } => ListEvent::SessionExpired {
                resource: self.config.key.clone(),
                message: message.clone(),
            },
            other => ListEvent::FetchFailed {
                resource: self.config.key.clone(),
                code: other.error_code().to_string(),
                message: other.message().to_string(),
            },
        };
        self.events.publish(event);
    }

    /// Fetch and decide what comes next: one cycle of the polling machine
    ///
    /// Returns the fetch result together with the delay of the next cycle.
    async fn cycle(&self) -> (ListResult<FetchSummary>, Option<Duration>) {
        let _gate = self.fetch_gate.lock().await;
        let result = self.fetch_locked().await;

        let next = match &result {
            Ok(summary) => summary.next_poll,
            Err(error) => {
                let failures = {
                    let mut state = self.write();
                    state.loading = false;
                    state.consecutive_failures += 1;
                    state.consecutive_failures
                };
                match error {
                    ListError::Fetch(fetch_error) => {
                        self.policy.after_failure(fetch_error, failures)
                    }
                    _ => None,
                }
            }
        };

        self.set_poll_state(next);
        (result, next)
    }

    fn set_poll_state(&self, next: Option<Duration>) {
        let previous = {
            let mut state = self.write();
            let previous = state.poll_state;
            state.poll_state = if next.is_some() {
                PollState::Polling
            } else {
                PollState::Idle
            };
            previous
        };

        match next {
            Some(delay) if previous == PollState::Idle => {
                tracing::info!(resource = %self.config.key, delay_ms = delay.as_millis() as u64, "Polling started");
                self.events.publish(ListEvent::PollingStarted {
                    resource: self.config.key.clone(),
                    delay_ms: delay.as_millis() as u64,
                });
            }
            Some(delay) => {
                tracing::debug!(resource = %self.config.key, delay_ms = delay.as_millis() as u64, "Refresh scheduled");
            }
            None if previous == PollState::Polling => {
                tracing::info!(resource = %self.config.key, "Polling stopped");
                self.events.publish(ListEvent::PollingStopped {
                    resource: self.config.key.clone(),
                });
            }
            None => {}
        }
    }

    /// Fetch now and keep refreshing while records are transitional
    ///
    /// This is the page's load/reload entry point. When the fetch reports
    /// transitional records (or a retryable failure within the retry budget)
    /// a follow-up fetch is scheduled after the delay this fetch decided; a
    /// previously scheduled refresh is replaced, never duplicated. When
    /// nothing is left to wait for, any scheduled refresh is cancelled.
    pub async fn refresh(self: &Arc<Self>) -> ListResult<FetchSummary> {
        let (result, next) = self.cycle().await;
        match next {
            Some(delay) => self.schedule(delay),
            None => self.cancel_scheduled(),
        }
        result
    }

    fn schedule(self: &Arc<Self>, delay: Duration) {
        let mut poll = self.poll.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = poll.take() {
            previous.cancel();
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        let task = tokio::spawn(async move {
            let mut delay = delay;
            loop {
                tokio::time::sleep(delay).await;
                let Some(list) = weak.upgrade() else {
                    break;
                };
                match list.cycle().await {
                    (_, Some(next)) => delay = next,
                    (_, None) => break,
                }
            }
        });
        *poll = Some(PollHandle::new(self.config.key.clone(), task));
    }

    fn cancel_scheduled(&self) {
        let handle = self.poll.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(handle) = handle {
            handle.cancel();
        }
    }

    /// Stop auto-refresh; the hosting page calls this on teardown
    pub fn cancel_polling(&self) {
        self.cancel_scheduled();
        self.set_poll_state(None);
    }

    /// Whether a follow-up fetch is currently scheduled
    pub fn is_polling(&self) -> bool {
        self.poll
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Free-text search over the fetched records
    ///
    /// Recomputes the displayed list from the unfiltered set and returns it.
    pub fn search(&self, text: &str) -> Vec<Record> {
        let mut state = self.write();
        let items = search_filter(
            &state.items,
            &state.unfiltered,
            text,
            &self.config.search_fields,
        );
        state.search_text = text.to_string();
        state.items = items.clone();
        items
    }

    /// Re-apply the page's URL filters to the unfiltered set
    pub fn apply_query_filters(&self) -> Vec<Record> {
        let mut state = self.write();
        let items = apply_param_filters(&state.unfiltered, &self.query);
        state.items = items.clone();
        items
    }
}

impl Drop for ResourceList {
    fn drop(&mut self) {
        if let Some(handle) = self.poll.get_mut().ok().and_then(Option::take) {
            handle.cancel();
        }
    }
}
