//! In-process `DocumentStore` used by tests and local tooling.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;

use crate::path::{CollectionPath, DocPath};
use crate::store::{DocumentStore, StoredDocument};
use crate::DbError;

/// Documents keyed by collection path, then id.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: Mutex<BTreeMap<String, BTreeMap<String, Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().values().map(BTreeMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Synchronous read, for assertions.
    #[must_use]
    pub fn peek(&self, path: &DocPath) -> Option<Value> {
        self.lock()
            .get(path.collection.as_str())
            .and_then(|c| c.get(&path.id))
            .cloned()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, BTreeMap<String, Value>>> {
        self.docs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn collect(
        &self,
        collection: &CollectionPath,
        keep: impl Fn(&Value) -> bool,
    ) -> Vec<StoredDocument> {
        self.lock()
            .get(collection.as_str())
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| keep(data))
                    .map(|(id, data)| StoredDocument {
                        id: id.clone(),
                        data: data.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocPath) -> Result<Option<Value>, DbError> {
        Ok(self.peek(path))
    }

    async fn set(&self, path: &DocPath, data: &Value) -> Result<(), DbError> {
        self.lock()
            .entry(path.collection.as_str().to_string())
            .or_default()
            .insert(path.id.clone(), data.clone());
        Ok(())
    }

    async fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, DbError> {
        Ok(self.collect(collection, |data| {
            data.get(field).and_then(Value::as_str) == Some(value)
        }))
    }

    async fn list(&self, collection: &CollectionPath) -> Result<Vec<StoredDocument>, DbError> {
        Ok(self.collect(collection, |_| true))
    }
}
