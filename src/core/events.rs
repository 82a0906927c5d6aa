//! List events for the hosting page
//!
//! The EventBus decouples the list manager from whatever renders it. Every
//! observable side effect (a finished fetch, a dismissed sort menu, an
//! expired session) is published here; the page subscribes and reacts.
//!
//! ```text
//! ResourceList::fetch() ──┐
//!                         ├──▶ EventBus::publish() ──▶ broadcast channel ──▶ page renderer
//! ViewStateStore ─────────┘                                             ──▶ session guard
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! let event_bus = EventBus::new(64);
//! let mut rx = event_bus.subscribe();
//!
//! event_bus.publish(ListEvent::SortMenuDismissed {
//!     resource: "volumes".to_string(),
//! });
//!
//! if let Ok(envelope) = rx.recv().await {
//!     println!("Received: {:?}", envelope.event);
//! }
//! ```

use crate::core::view_state::ViewMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

/// Events emitted by a resource list and its view state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListEvent {
    /// A fetch completed and both collections were replaced
    ItemsLoaded {
        resource: String,
        total: usize,
        displayed: usize,
        transitional: usize,
    },
    /// A fetch failed; the page decides how to notify the user
    FetchFailed {
        resource: String,
        code: String,
        message: String,
    },
    /// Authorization expired; the page must end the session
    SessionExpired { resource: String, message: String },
    /// The list went from idle to auto-refresh; `delay_ms` is the first delay
    PollingStarted { resource: String, delay_ms: u64 },
    /// No further fetch is scheduled
    PollingStopped { resource: String },
    /// The sort key changed
    SortChanged { resource: String, sort_key: String },
    /// Any open sort-selection menu should close
    SortMenuDismissed { resource: String },
    /// The sort direction flipped
    SortDirectionChanged { resource: String, reverse: bool },
    /// The view switched between table and grid
    ViewModeChanged { resource: String, mode: ViewMode },
}

impl ListEvent {
    /// The resource key this event relates to
    pub fn resource(&self) -> &str {
        match self {
            ListEvent::ItemsLoaded { resource, .. }
            | ListEvent::FetchFailed { resource, .. }
            | ListEvent::SessionExpired { resource, .. }
            | ListEvent::PollingStarted { resource, .. }
            | ListEvent::PollingStopped { resource }
            | ListEvent::SortChanged { resource, .. }
            | ListEvent::SortMenuDismissed { resource }
            | ListEvent::SortDirectionChanged { resource, .. }
            | ListEvent::ViewModeChanged { resource, .. } => resource,
        }
    }

    /// Short name of the event
    pub fn name(&self) -> &'static str {
        match self {
            ListEvent::ItemsLoaded { .. } => "items_loaded",
            ListEvent::FetchFailed { .. } => "fetch_failed",
            ListEvent::SessionExpired { .. } => "session_expired",
            ListEvent::PollingStarted { .. } => "polling_started",
            ListEvent::PollingStopped { .. } => "polling_stopped",
            ListEvent::SortChanged { .. } => "sort_changed",
            ListEvent::SortMenuDismissed { .. } => "sort_menu_dismissed",
            ListEvent::SortDirectionChanged { .. } => "sort_direction_changed",
            ListEvent::ViewModeChanged { .. } => "view_mode_changed",
        }
    }
}

/// Envelope wrapping an event with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Unique event ID
    pub id: Uuid,
    /// When the event occurred
    pub timestamp: DateTime<Utc>,
    /// The actual event
    pub event: ListEvent,
}

impl EventEnvelope {
    /// Create a new event envelope
    pub fn new(event: ListEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            event,
        }
    }
}

/// Broadcast-based event bus
///
/// Uses `tokio::sync::broadcast`, which allows multiple receivers. The bus is
/// cheap to clone and can be shared by every list of a page.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<EventEnvelope>,
}

impl EventBus {
    /// Create a new EventBus with the given channel capacity
    ///
    /// Slow receivers lose events (lagged) once `capacity` is exceeded.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all subscribers
    ///
    /// Never fails. Without subscribers the event is dropped.
    /// Returns the number of receivers that will receive the event.
    pub fn publish(&self, event: ListEvent) -> usize {
        let envelope = EventEnvelope::new(event);
        self.sender.send(envelope).unwrap_or(0)
    }

    /// Subscribe to future events
    pub fn subscribe(&self) -> broadcast::Receiver<EventEnvelope> {
        self.sender.subscribe()
    }

    /// Get the current number of active subscribers
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
