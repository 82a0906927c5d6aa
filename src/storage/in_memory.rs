//! In-memory implementations for testing and development

use crate::core::error::{FetchError, StorageError};
use crate::core::record::{ListPayload, Record};
use crate::core::{KeyValueStore, RecordSource};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

/// In-memory preference store
///
/// Uses RwLock for thread-safe access. Cloning shares the same map, so two
/// page instances built from clones see each other's writes like two tabs
/// of the same browser profile.
#[derive(Clone, Default)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|e| StorageError::LockPoisoned {
            message: e.to_string(),
        })?;
        entries.remove(key);
        Ok(())
    }
}

/// In-memory record source
///
/// Serves whatever records were last set. Failures queued with
/// [`Self::fail_next`] are returned by the following fetches, one each,
/// before records are served again.
#[derive(Clone, Default)]
pub struct InMemoryRecordSource {
    records: Arc<RwLock<Vec<Record>>>,
    failures: Arc<Mutex<VecDeque<FetchError>>>,
    fetches: Arc<AtomicUsize>,
}

impl InMemoryRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records: Arc::new(RwLock::new(records)),
            ..Self::default()
        }
    }

    /// Replace the records served by later fetches
    pub fn set_records(&self, records: Vec<Record>) {
        if let Ok(mut current) = self.records.write() {
            *current = records;
        }
    }

    /// Queue a failure for the next fetch
    pub fn fail_next(&self, error: FetchError) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.push_back(error);
        }
    }

    /// Number of fetches served so far, failures included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn fetch(&self) -> Result<ListPayload, FetchError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let failure = self
            .failures
            .lock()
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?
            .pop_front();
        if let Some(error) = failure {
            return Err(error);
        }

        let records = self.records.read().map_err(|e| FetchError::Transport {
            message: e.to_string(),
        })?;
        Ok(ListPayload::new(records.clone()))
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
