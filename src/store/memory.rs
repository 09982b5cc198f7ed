//! Process-local store backed by a map. Used by tests and by embedders that
//! bring their own persistence.

use super::KvStore;
use crate::errors::{Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

/// Entries sit behind a `std::sync::Mutex`; no `.await` runs while the lock
/// is held, so a blocking lock is enough. A poisoned lock surfaces as
/// [`Error::Storage`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, String>>> {
        self.entries.lock().map_err(|e| Error::Storage {
            message: format!("memory store lock poisoned: {e}"),
        })
    }

    /// Copy of every entry, ordered by key.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .lock()?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}

impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        self.lock()?.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.get("k").await?, None);

        store.set("k", "1".to_string()).await?;
        store.set("k", "2".to_string()).await?;
        assert_eq!(store.get("k").await?.as_deref(), Some("2"));

        store.remove("k").await?;
        store.remove("k").await?;
        assert_eq!(store.get("k").await?, None);
        assert!(store.snapshot()?.is_empty());
        Ok(())
    }
}
