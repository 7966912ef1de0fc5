//! Key-value store collaborator.
//!
//! The record store persists each collection as one JSON document under a
//! storage key. Anything that can `load` and `save` a string by key can back
//! it: [`MemoryStore`] keeps documents in process memory, [`DatabaseStore`]
//! writes them to the `kv_entries` table.

use crate::{
    entities::{KvEntry, kv_entry},
    errors::Result,
};
use sea_orm::{DatabaseConnection, Set, prelude::*};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace};

/// Get/set access to JSON documents by key.
///
/// Failures are reported as errors and never retried; the caller sees them
/// unchanged.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    /// Returns the document stored under `key`, or `None` if nothing is stored.
    async fn load(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the document stored under `key`.
    async fn save(&self, key: &str, json: String) -> Result<()>;
}

/// In-process store. Contents live as long as the value does.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw documents, e.g. data written by an older version.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn save(&self, key: &str, json: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        trace!("Saving {} bytes under '{}'", json.len(), key);
        entries.insert(key.to_string(), json);
        Ok(())
    }
}

/// Store backed by the `kv_entries` database table.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    db: DatabaseConnection,
}

impl DatabaseStore {
    /// Wraps an open connection. Tables must already exist
    /// (see [`crate::config::database::create_tables`]).
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

impl KeyValueStore for DatabaseStore {
    #[instrument(skip(self))]
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let entry = KvEntry::find_by_id(key.to_string()).one(&self.db).await?;
        debug!("Loaded '{}': {}", key, if entry.is_some() { "found" } else { "absent" });
        Ok(entry.map(|e| e.value))
    }

    #[instrument(skip(self, json))]
    async fn save(&self, key: &str, json: String) -> Result<()> {
        let now = chrono::Utc::now().naive_utc();

        let existing = KvEntry::find_by_id(key.to_string()).one(&self.db).await?;

        if let Some(entry) = existing {
            let mut active_model: kv_entry::ActiveModel = entry.into();
            active_model.value = Set(json);
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_entry = kv_entry::ActiveModel {
                key: Set(key.to_string()),
                value: Set(json),
                updated_at: Set(now),
            };
            new_entry.insert(&self.db).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_memory_store_load_missing_key() -> Result<()> {
        let store = MemoryStore::new();
        assert_eq!(store.load("EmployeeData").await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_save_replaces_value() -> Result<()> {
        let store = MemoryStore::with_entries([("k", "[1]")]);
        assert_eq!(store.load("k").await?.as_deref(), Some("[1]"));

        store.save("k", "[2]".to_string()).await?;
        assert_eq!(store.load("k").await?.as_deref(), Some("[2]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_database_store_round_trip() -> Result<()> {
        let store = DatabaseStore::new(setup_test_db().await?);

        assert_eq!(store.load("PayrollData").await?, None);

        store.save("PayrollData", "[]".to_string()).await?;
        assert_eq!(store.load("PayrollData").await?.as_deref(), Some("[]"));

        store
            .save("PayrollData", r#"[{"employeeId":"E001"}]"#.to_string())
            .await?;
        assert_eq!(
            store.load("PayrollData").await?.as_deref(),
            Some(r#"[{"employeeId":"E001"}]"#)
        );

        // One row per key
        let count = KvEntry::find().count(store.connection()).await?;
        assert_eq!(count, 1);
        Ok(())
    }
}
