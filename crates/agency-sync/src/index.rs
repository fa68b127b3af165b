//! Persistence of the per-category `_index` document.
//!
//! The merge reads the current index and overwrites it without any version
//! check; two concurrent writers can lose each other's entries.

use agency_core::{merge_index, Brief, Category, Entity, IndexDocument, Post, ValidationError};
use agency_db::DocumentStore;
use serde_json::Value;

use crate::context::SyncContext;
use crate::error::SyncError;

fn require_index(category: Category) -> Result<(), ValidationError> {
    if category.has_index() {
        Ok(())
    } else {
        Err(ValidationError::InvalidField {
            field: "category",
            reason: format!("{category} do not keep an index"),
        })
    }
}

/// Read the category's index document; absent reads as empty.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] for a category without an index,
/// [`SyncError::Remote`] on store failure and [`SyncError::Document`] if the
/// stored index is malformed.
pub async fn list_index<S: DocumentStore>(
    ctx: &SyncContext<S>,
    category: Category,
) -> Result<IndexDocument, SyncError> {
    require_index(category)?;
    let path = ctx.collection(category).index_doc();
    match ctx.store().get(&path).await? {
        Some(data) => serde_json::from_value(data).map_err(|e| SyncError::document(&path, e)),
        None => Ok(IndexDocument::default()),
    }
}

/// Merge `entries` into the stored index and write it back.
///
/// A malformed stored index is treated as empty so the write can repair it.
///
/// # Errors
///
/// Returns [`SyncError::Remote`] if the read or the write fails.
pub async fn update_index<S: DocumentStore>(
    ctx: &SyncContext<S>,
    category: Category,
    entries: Vec<Value>,
) -> Result<IndexDocument, SyncError> {
    let path = ctx.collection(category).index_doc();
    let existing = match ctx.store().get(&path).await? {
        Some(data) => match serde_json::from_value::<IndexDocument>(data) {
            Ok(index) => index.items,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "stored index is malformed; rebuilding from new entries");
                Vec::new()
            }
        },
        None => Vec::new(),
    };

    let index = IndexDocument::new(merge_index(existing, entries));
    write_index(ctx, category, &index).await?;
    Ok(index)
}

async fn write_index<S: DocumentStore>(
    ctx: &SyncContext<S>,
    category: Category,
    index: &IndexDocument,
) -> Result<(), SyncError> {
    let path = ctx.collection(category).index_doc();
    let data = serde_json::to_value(index).map_err(|e| SyncError::document(&path, e))?;
    ctx.store().set(&path, &data).await?;
    Ok(())
}

/// Rebuild the index from a full scan of the category, ignoring the stored
/// index. Documents that do not decode are skipped with a warning.
///
/// # Errors
///
/// Returns [`SyncError::Validation`] for a category without an index and
/// [`SyncError::Remote`] if the scan or the write fails.
pub async fn rebuild_index<S: DocumentStore>(
    ctx: &SyncContext<S>,
    category: Category,
    dry_run: bool,
) -> Result<IndexDocument, SyncError> {
    require_index(category)?;
    let docs = ctx.list_remote(category).await?;

    let mut entries = Vec::with_capacity(docs.len());
    for doc in docs {
        let entry = match category {
            Category::Briefs => entry_from::<Brief>(doc.data),
            Category::Posts => entry_from::<Post>(doc.data),
            Category::Signals => continue,
        };
        match entry {
            // The stored path is authoritative, whatever the data says.
            Ok(Some(mut entry)) => {
                if let Value::Object(fields) = &mut entry {
                    fields.insert("id".to_string(), Value::String(doc.id.clone()));
                }
                entries.push(entry);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(category = %category, id = %doc.id, error = %e, "skipping undecodable document");
            }
        }
    }

    let index = IndexDocument::new(merge_index(Vec::new(), entries));
    if dry_run {
        tracing::info!(category = %category, count = index.count, "dry-run: index not written");
    } else {
        write_index(ctx, category, &index).await?;
        tracing::info!(category = %category, count = index.count, "index rebuilt");
    }
    Ok(index)
}

fn entry_from<E: Entity>(data: Value) -> Result<Option<Value>, serde_json::Error> {
    serde_json::from_value::<E>(data).map(|e| e.index_entry())
}
