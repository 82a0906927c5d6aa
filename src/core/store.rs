//! Key-value persistence for view preferences

use crate::core::error::StorageError;

/// String key-value store surviving page loads
///
/// The list manager only needs `get`/`set` of plain strings. Backends: an
/// in-memory map (tests), a JSON file on disk, or LMDB behind the `lmdb`
/// feature. Keys are namespaced by callers (`<resource>-sortBy`), so a store
/// can be shared by every list of a console.
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Build the namespaced key for one resource preference
pub fn scoped_key(resource: &str, name: &str) -> String {
    format!("{}-{}", resource, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scoped_key() {
        assert_eq!(scoped_key("volumes", "sortBy"), "volumes-sortBy");
        assert_eq!(scoped_key("images", "landingPageView"), "images-landingPageView");
    }
}
