//! Key-value persistence for the ledgers.
//!
//! Every collection lives under one string key as a JSON array and is read and
//! written in full. Backends only need `get`, `set` and `remove`; the typed
//! helpers in this module handle encoding and the "malformed means empty" rule.

pub mod memory;
pub mod sea;

pub use memory::MemoryStore;
pub use sea::SeaOrmStore;

use crate::errors::Result;
use serde::{Serialize, de::DeserializeOwned};
use std::future::Future;
use tracing::{debug, warn};

/// Inventory items collection key
pub const INVENTORY_KEY: &str = "hotelBarInventory";
/// Menu items collection key
pub const MENU_KEY: &str = "hotelBarMenu";
/// Sale records collection key
pub const SALES_KEY: &str = "hotelBarSales";
/// Transfer records collection key
pub const TRANSFERS_KEY: &str = "barTransferRecords";
/// Current session identity key
pub const USER_KEY: &str = "user";

/// String-keyed storage holding serialized JSON values.
///
/// A single `set` is assumed to land atomically. Nothing spans keys.
pub trait KvStore {
    /// Returns the raw value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Replaces the value stored under `key`.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;

    /// Deletes `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Loads a whole collection. A missing key or unparseable JSON yields an empty
/// collection instead of an error.
pub async fn load_collection<S, T>(store: &S, key: &str) -> Result<Vec<T>>
where
    S: KvStore,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key).await? else {
        debug!("No stored value for `{}`, starting empty", key);
        return Ok(Vec::new());
    };

    match serde_json::from_str::<Vec<T>>(&raw) {
        Ok(items) => {
            debug!("Loaded {} records from `{}`", items.len(), key);
            Ok(items)
        }
        Err(e) => {
            warn!("Stored value for `{}` is malformed, treating as empty: {}", key, e);
            Ok(Vec::new())
        }
    }
}

/// Writes a whole collection, replacing whatever was stored before.
pub async fn save_collection<S, T>(store: &S, key: &str, items: &[T]) -> Result<()>
where
    S: KvStore,
    T: Serialize,
{
    let raw = serde_json::to_string(items)?;
    store.set(key, raw).await?;
    debug!("Saved {} records to `{}`", items.len(), key);
    Ok(())
}

/// Replaces a collection with an empty array. Calling it again is a no-op.
pub async fn clear_collection<S: KvStore>(store: &S, key: &str) -> Result<()> {
    store.set(key, "[]".to_string()).await
}
