//! The context object threaded through every sync operation.

use agency_core::{AppConfig, Category, Entity};
use agency_db::{CollectionPath, DbError, DocPath, DocumentStore, StoredDocument, TenantPath};
use chrono::{SecondsFormat, Utc};

use crate::error::SyncError;
use crate::local::LocalStore;

/// Remote store client, tenant location and local file root for one run.
///
/// Nothing here caches remote state; each call goes to the store.
#[derive(Debug)]
pub struct SyncContext<S> {
    store: S,
    tenant: TenantPath,
    local: LocalStore,
}

impl<S: DocumentStore> SyncContext<S> {
    pub fn new(store: S, tenant: TenantPath, local: LocalStore) -> Self {
        Self {
            store,
            tenant,
            local,
        }
    }

    pub fn from_app_config(store: S, config: &AppConfig) -> Self {
        Self::new(
            store,
            TenantPath::from_app_config(config),
            LocalStore::new(&config.local_root),
        )
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn local(&self) -> &LocalStore {
        &self.local
    }

    pub fn tenant(&self) -> &TenantPath {
        &self.tenant
    }

    pub fn collection(&self, category: Category) -> CollectionPath {
        self.tenant.category(category)
    }

    pub fn doc_path(&self, category: Category, id: &str) -> DocPath {
        self.collection(category).doc(id)
    }

    /// Write the full entity under `{tenant}/{category}/{id}`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Document`] if the entity does not serialize and
    /// [`SyncError::Remote`] if the store rejects the write.
    pub async fn upsert_remote<E: Entity>(&self, entity: &E) -> Result<(), SyncError> {
        let data = serde_json::to_value(entity)
            .map_err(|e| SyncError::document(self.doc_path(E::CATEGORY, entity.id()), e))?;
        self.store
            .set(&self.doc_path(E::CATEGORY, entity.id()), &data)
            .await?;
        Ok(())
    }

    /// Fetch and decode the remote copy of `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Remote`] on store failure and
    /// [`SyncError::Document`] if the stored JSON is not an `E`.
    pub async fn read_remote<E: Entity>(&self, id: &str) -> Result<Option<E>, SyncError> {
        let path = self.doc_path(E::CATEGORY, id);
        match self.store.get(&path).await? {
            Some(data) => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| SyncError::document(&path, e)),
            None => Ok(None),
        }
    }

    /// Entities in `category` whose `field` equals `value`, excluding the
    /// reserved index document.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the query fails.
    pub async fn query_remote_by_field(
        &self,
        category: Category,
        field: &str,
        value: &str,
    ) -> Result<Vec<StoredDocument>, DbError> {
        let docs = self
            .store
            .query_by_field(&self.collection(category), field, value)
            .await?;
        Ok(without_index(docs))
    }

    /// Every entity document in `category`, excluding the index.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the listing fails.
    pub async fn list_remote(&self, category: Category) -> Result<Vec<StoredDocument>, DbError> {
        let docs = self.store.list(&self.collection(category)).await?;
        Ok(without_index(docs))
    }

    pub fn read_local_by_id<E: Entity>(&self, id: &str) -> Result<Option<E>, SyncError> {
        self.local.read(id)
    }
}

fn without_index(docs: Vec<StoredDocument>) -> Vec<StoredDocument> {
    docs.into_iter()
        .filter(|d| d.id != agency_core::INDEX_DOC_ID)
        .collect()
}

/// Current time as an RFC 3339 UTC timestamp with second precision.
pub(crate) fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}
