//! LMDB preference store using heed (memory-mapped B-tree).
//!
//! LMDB is an embedded key-value store, so no external server is required.
//! Preference reads and writes are tiny and synchronous, matching the
//! synchronous [`KeyValueStore`] contract; no blocking pool is involved.
//!
//! # Databases (named LMDB sub-databases)
//!
//! - `preferences`: `<resource>-<name>` to a plain string value
//!
//! # Feature flag
//!
//! Enable with `--features lmdb`. Requires the `heed` crate.

use crate::core::KeyValueStore;
use crate::core::error::StorageError;
use heed::types::Str;
use heed::{Database, Env, EnvOpenOptions};
use std::path::Path;
use std::sync::Arc;

fn backend_error(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend {
        backend: "lmdb".to_string(),
        message: e.to_string(),
    }
}

/// LMDB-backed implementation of [`KeyValueStore`].
///
/// The `Env` is wrapped in an `Arc` for cheap cloning across page instances.
///
/// # Example
///
/// ```rust,ignore
/// use landing::storage::LmdbKeyValueStore;
///
/// let store = LmdbKeyValueStore::open("/tmp/console-prefs")?;
/// store.set("volumes-sortBy", "create_time")?;
/// ```
#[derive(Clone)]
pub struct LmdbKeyValueStore {
    env: Arc<Env>,
    db: Database<Str, Str>,
}

impl LmdbKeyValueStore {
    /// Open (or create) an LMDB environment at `path` and initialise the
    /// `preferences` named database.
    ///
    /// Preferences are tiny, so the map size is kept at 16 MB. LMDB only
    /// reserves that address space, it does not allocate it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        std::fs::create_dir_all(path.as_ref()).map_err(|e| StorageError::Io {
            path: path.as_ref().display().to_string(),
            message: e.to_string(),
        })?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(16 * 1024 * 1024)
                .max_dbs(4)
                .max_readers(126)
                .open(path.as_ref())
                .map_err(backend_error)?
        };

        let mut wtxn = env.write_txn().map_err(backend_error)?;
        let db: Database<Str, Str> = env
            .create_database(&mut wtxn, Some("preferences"))
            .map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)?;

        Ok(Self {
            env: Arc::new(env),
            db,
        })
    }
}

impl KeyValueStore for LmdbKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let rtxn = self.env.read_txn().map_err(backend_error)?;
        let value = self.db.get(&rtxn, key).map_err(backend_error)?;
        Ok(value.map(str::to_string))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut wtxn = self.env.write_txn().map_err(backend_error)?;
        self.db.put(&mut wtxn, key, value).map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut wtxn = self.env.write_txn().map_err(backend_error)?;
        self.db.delete(&mut wtxn, key).map_err(backend_error)?;
        wtxn.commit().map_err(backend_error)
    }
}
