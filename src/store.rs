//! Durable key/value storage for form snapshots and submitted bookings.
//!
//! Values are opaque strings (JSON in practice). The on-disk backend is a
//! fjall keyspace; the in-memory backend serves tests and ephemeral sessions.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, anyhow};
use fjall::Keyspace;

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        (**self).put(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("Memory store lock poisoned"))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

pub struct FjallStore {
    store: Keyspace,
}

impl FjallStore {
    /// Opens (or creates) the store under `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let db = fjall::Database::builder(path)
            .open()
            .with_context(|| format!("Failed to open store at {}", path.display()))?;
        let items = db.keyspace("booking", fjall::KeyspaceCreateOptions::default)?;
        Ok(FjallStore { store: items })
    }
}

impl KeyValueStore for FjallStore {
    #[tracing::instrument(name = "query_store", level = "debug", skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>> {
        let Some(bytes) = self.store.get(key.as_bytes())? else {
            tracing::debug!("Key not found");
            return Ok(None);
        };
        let value = String::from_utf8(bytes.to_vec())
            .with_context(|| format!("Stored value for '{key}' is not UTF-8"))?;
        Ok(Some(value))
    }

    #[tracing::instrument(name = "put_store", level = "debug", skip(self, value))]
    fn put(&self, key: &str, value: &str) -> Result<()> {
        self.store
            .insert(key.as_bytes().to_vec(), value.as_bytes().to_vec())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.store.remove(key.as_bytes().to_vec())?;
        Ok(())
    }
}
