//! Hierarchical document paths: `{tenant-collection}/{tenant-id}/{category}/{id}`.

use std::fmt;

use agency_core::{AppConfig, Category, INDEX_DOC_ID};

/// Where one tenant's data lives in the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantPath {
    pub collection: String,
    pub tenant_id: String,
}

impl TenantPath {
    #[must_use]
    pub fn new(collection: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            tenant_id: tenant_id.into(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(&config.tenant_collection, &config.tenant_id)
    }

    #[must_use]
    pub fn category(&self, category: Category) -> CollectionPath {
        CollectionPath(format!(
            "{}/{}/{}",
            self.collection,
            self.tenant_id,
            category.as_str()
        ))
    }
}

/// Path of a sub-collection, e.g. `clients/acme/briefs`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionPath(String);

impl CollectionPath {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn doc(&self, id: impl Into<String>) -> DocPath {
        DocPath {
            collection: self.clone(),
            id: id.into(),
        }
    }

    /// The reserved document holding this collection's index.
    #[must_use]
    pub fn index_doc(&self) -> DocPath {
        self.doc(INDEX_DOC_ID)
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Full path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    pub collection: CollectionPath,
    pub id: String,
}

impl DocPath {
    #[must_use]
    pub fn is_index(&self) -> bool {
        self.id == INDEX_DOC_ID
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}
