//! Preference stores and record sources for different backends

pub mod in_memory;
pub mod json_file;
#[cfg(feature = "lmdb")]
pub mod lmdb;

pub use in_memory::{InMemoryKeyValueStore, InMemoryRecordSource};
pub use json_file::JsonFileStore;
#[cfg(feature = "lmdb")]
pub use lmdb::LmdbKeyValueStore;
