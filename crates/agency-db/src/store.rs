//! The remote document-store seam.
//!
//! Engines take a `DocumentStore` as an explicit dependency so the Postgres
//! store and the in-memory store are interchangeable.

use std::future::Future;

use serde_json::Value;

use crate::path::{CollectionPath, DocPath};
use crate::DbError;

/// A document and its id within a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: Value,
}

/// Get / set / query-by-field primitives over JSON documents.
///
/// Implementations hold no cache: every call observes the store's current
/// state. Writes are whole-document overwrites.
pub trait DocumentStore: Send + Sync {
    /// Fetch one document, `None` if absent.
    fn get(&self, path: &DocPath) -> impl Future<Output = Result<Option<Value>, DbError>> + Send;

    /// Create or fully replace one document.
    fn set(&self, path: &DocPath, data: &Value) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Documents in `collection` whose top-level `field` equals `value`
    /// exactly, ordered by id.
    fn query_by_field(
        &self,
        collection: &CollectionPath,
        field: &str,
        value: &str,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, DbError>> + Send;

    /// Every document in `collection`, including reserved ones, ordered by id.
    fn list(
        &self,
        collection: &CollectionPath,
    ) -> impl Future<Output = Result<Vec<StoredDocument>, DbError>> + Send;
}
