//! Polling decisions and the handle owning a scheduled refresh

use crate::config::ResourceConfig;
use crate::core::error::FetchError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Whether a list has a follow-up fetch scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollState {
    #[default]
    Idle,
    Polling,
}

/// Decides when the next fetch happens, if ever
///
/// - success with transitional records: after `interval`
/// - success without transitional records: never
/// - session expiry: never
/// - other retryable failure: after `interval * multiplier^n` for the n-th
///   consecutive failure, up to `max_retries`; then never
#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_retries: u32,
    pub backoff_multiplier: u32,
}

impl PollPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_retries: 0,
            backoff_multiplier: 2,
        }
    }

    pub fn from_config(config: &ResourceConfig) -> Self {
        Self {
            interval: config.poll_interval(),
            max_retries: config.max_retries,
            backoff_multiplier: config.backoff_multiplier.max(1),
        }
    }

    /// Delay after a successful fetch
    pub fn after_success(&self, transitional: usize) -> Option<Duration> {
        (transitional > 0).then_some(self.interval)
    }

    /// Delay after the `failures`-th consecutive failed fetch (1-based)
    pub fn after_failure(&self, error: &FetchError, failures: u32) -> Option<Duration> {
        if !error.is_retryable() || failures == 0 || failures > self.max_retries {
            return None;
        }
        let factor = self
            .backoff_multiplier
            .checked_pow(failures)
            .unwrap_or(u32::MAX);
        Some(self.interval.saturating_mul(factor))
    }
}

/// Handle on a scheduled refresh task
///
/// The hosting page cancels it on teardown; dropping the handle cancels too,
/// so a destroyed view never receives a late fetch.
#[derive(Debug)]
pub struct PollHandle {
    resource: String,
    task: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn new(resource: impl Into<String>, task: JoinHandle<()>) -> Self {
        Self {
            resource: resource.into(),
            task,
        }
    }

    /// Abort the scheduled refresh
    pub fn cancel(&self) {
        if !self.task.is_finished() {
            tracing::debug!(resource = %self.resource, "Cancelling scheduled refresh");
            self.task.abort();
        }
    }

    /// Whether the refresh loop has ended (stopped, cancelled or panicked)
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> FetchError {
        FetchError::Transport {
            message: "connection refused".to_string(),
        }
    }

    #[test]
    fn test_after_success() {
        let policy = PollPolicy::new(Duration::from_secs(5));
        assert_eq!(policy.after_success(2), Some(Duration::from_secs(5)));
        assert_eq!(policy.after_success(0), None);
    }

    #[test]
    fn test_failure_without_retries_stops() {
        let policy = PollPolicy::new(Duration::from_secs(5));
        assert_eq!(policy.after_failure(&transport(), 1), None);
    }

    #[test]
    fn test_failure_backoff() {
        let policy = PollPolicy {
            interval: Duration::from_secs(4),
            max_retries: 3,
            backoff_multiplier: 2,
        };
        assert_eq!(policy.after_failure(&transport(), 1), Some(Duration::from_secs(8)));
        assert_eq!(policy.after_failure(&transport(), 2), Some(Duration::from_secs(16)));
        assert_eq!(policy.after_failure(&transport(), 3), Some(Duration::from_secs(32)));
        assert_eq!(policy.after_failure(&transport(), 4), None);
    }

    #[test]
    fn test_session_expiry_never_retries() {
        let policy = PollPolicy {
            interval: Duration::from_secs(4),
            max_retries: 10,
            backoff_multiplier: 2,
        };
        let expired = FetchError::SessionExpired {
            message: "expired".to_string(),
        };
        assert_eq!(policy.after_failure(&expired, 1), None);
    }

    #[tokio::test]
    async fn test_handle_cancel() {
        let task = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        });
        let handle = PollHandle::new("volumes", task);
        assert!(!handle.is_finished());

        handle.cancel();
        for _ in 0..16 {
            if handle.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(handle.is_finished());
    }
}
