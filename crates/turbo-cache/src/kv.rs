//! Key-Value store with automatic serialization.

use crate::CacheError;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Type-safe in-memory cache.
///
/// Values are stored as JSON bytes, so anything that implements
/// `Serialize` and `DeserializeOwned` can be cached, and a stored value
/// is never aliased by the caller.
#[derive(Debug)]
pub struct Cache {
    name: String,
    store: RwLock<HashMap<String, Vec<u8>>>,
}

impl Cache {
    /// Create an empty, named store.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Store name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a value from the cache.
    ///
    /// Returns `None` if the key doesn't exist.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, CacheError> {
        match self.read()?.get(key) {
            Some(bytes) => Ok(Some(serde_json::from_slice(bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache, replacing any previous value.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;
        self.write()?.insert(key.to_string(), bytes);
        Ok(())
    }

    /// Delete a value from the cache.
    pub fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.write()?.remove(key);
        Ok(())
    }

    /// Check if a key exists in the cache.
    pub fn exists(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.read()?.contains_key(key))
    }

    /// Get all keys starting with `prefix`.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut keys: Vec<String> = self
            .read()?
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Drop every entry.
    pub fn clear(&self) -> Result<(), CacheError> {
        self.write()?.clear();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.store
            .read()
            .map_err(|e| CacheError::StoreError(format!("{}: {}", self.name, e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, Vec<u8>>>, CacheError> {
        self.store
            .write()
            .map_err(|e| CacheError::StoreError(format!("{}: {}", self.name, e)))
    }
}

/// Helper to build cache keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = cache_key!("variant", product_id, variant_key);
/// // Returns "variant:12:1:3|2:7"
/// ```
#[macro_export]
macro_rules! cache_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Entry {
        id: u64,
        label: String,
    }

    #[test]
    fn test_set_get_roundtrip() {
        let cache = Cache::new("test");
        let entry = Entry {
            id: 99,
            label: "M / Red".to_string(),
        };
        cache.set("variant:12:1:3|2:7", &entry).unwrap();

        let loaded: Option<Entry> = cache.get("variant:12:1:3|2:7").unwrap();
        assert_eq!(loaded, Some(entry));
        assert_eq!(cache.get::<Entry>("variant:12:missing").unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_delete() {
        let cache = Cache::new("test");
        cache.set("k", &1u32).unwrap();
        cache.set("k", &2u32).unwrap();
        assert_eq!(cache.get::<u32>("k").unwrap(), Some(2));

        cache.delete("k").unwrap();
        assert!(!cache.exists("k").unwrap());
    }

    #[test]
    fn test_type_mismatch_is_an_error() {
        let cache = Cache::new("test");
        cache.set("k", &"text").unwrap();
        assert!(matches!(
            cache.get::<u32>("k"),
            Err(CacheError::SerializeError(_))
        ));
    }

    #[test]
    fn test_keys_with_prefix_sorted() {
        let cache = Cache::new("test");
        cache.set("variant:2:a", &1).unwrap();
        cache.set("variant:1:a", &1).unwrap();
        cache.set("other", &1).unwrap();

        assert_eq!(
            cache.keys_with_prefix("variant:").unwrap(),
            vec!["variant:1:a".to_string(), "variant:2:a".to_string()]
        );

        cache.clear().unwrap();
        assert!(cache.keys_with_prefix("").unwrap().is_empty());
    }

    #[test]
    fn test_cache_key_macro() {
        let key = cache_key!("variant", 12, "1:3|2:7");
        assert_eq!(key, "variant:12:1:3|2:7");
    }
}
