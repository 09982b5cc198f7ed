//! SQLite-backed store: one `kv_entries` row per key, managed through `SeaORM`.

use super::KvStore;
use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use sea_orm::{Set, prelude::*};

#[derive(Debug, Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl KvStore for SeaOrmStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntry::find()
            .filter(kv_entry::Column::Key.eq(key))
            .one(&self.db)
            .await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();

        let existing = KvEntry::find()
            .filter(kv_entry::Column::Key.eq(key))
            .one(&self.db)
            .await?;

        if let Some(entry) = existing {
            let mut active_model: kv_entry::ActiveModel = entry.into();
            active_model.value = Set(value);
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = kv_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value),
                updated_at: Set(now),
                ..Default::default()
            };
            new_entry.insert(&self.db).await?;
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        KvEntry::delete_many()
            .filter(kv_entry::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::INVENTORY_KEY;
    use crate::test_utils::setup_sea_store;

    #[tokio::test]
    async fn test_get_missing_key() -> Result<()> {
        let store = setup_sea_store().await?;
        assert_eq!(store.get(INVENTORY_KEY).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_set_updates_existing_row() -> Result<()> {
        let store = setup_sea_store().await?;

        store.set(INVENTORY_KEY, "[]".to_string()).await?;
        store.set(INVENTORY_KEY, "[1]".to_string()).await?;
        assert_eq!(store.get(INVENTORY_KEY).await?.as_deref(), Some("[1]"));

        // Verify only one record exists
        let count = KvEntry::find()
            .filter(kv_entry::Column::Key.eq(INVENTORY_KEY))
            .count(store.connection())
            .await?;
        assert_eq!(count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_remove_deletes_row() -> Result<()> {
        let store = setup_sea_store().await?;
        store.set("user", "{}".to_string()).await?;
        store.remove("user").await?;
        store.remove("user").await?;
        assert_eq!(store.get("user").await?, None);
        Ok(())
    }
}
